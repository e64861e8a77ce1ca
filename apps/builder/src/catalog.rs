use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::card::{parse_card, Card, ID_PREFIX};
use crate::topics::{parse_topics, TopicIndex};

/// Summary metadata over the whole card set.
#[derive(Debug, Serialize, PartialEq)]
pub struct Meta {
    pub total_cards: usize,
    pub levels: Vec<String>,
    pub topics: Vec<String>,
}

/// The consolidated catalogue: metadata plus all cards sorted by id.
/// Regenerated in full on every build.
#[derive(Debug, Serialize)]
pub struct Catalog {
    pub meta: Meta,
    pub cards: Vec<Card>,
}

/// Attaches topics, sorts by id and computes the summary metadata.
pub fn assemble(mut cards: Vec<Card>, index: &TopicIndex) -> Catalog {
    for card in &mut cards {
        card.topic = index.topic_for(card.id).map(str::to_string);
    }
    cards.sort_by_key(|c| c.id);

    let levels: BTreeSet<&String> = cards.iter().filter_map(|c| c.level.as_ref()).collect();
    let topics: BTreeSet<&String> = cards.iter().filter_map(|c| c.topic.as_ref()).collect();

    Catalog {
        meta: Meta {
            total_cards: cards.len(),
            levels: levels.into_iter().cloned().collect(),
            topics: topics.into_iter().cloned().collect(),
        },
        cards,
    }
}

/// Serializes the catalogue with stable 2-space indentation. `serde_json`
/// keeps non-ASCII text literal, which the front end relies on.
pub fn render(catalog: &Catalog) -> Result<String> {
    serde_json::to_string_pretty(catalog).context("Failed to serialize catalogue")
}

/// Writes `contents` to `path` atomically: a temp file in the destination
/// directory is persisted over the target, so a failed build leaves any
/// previous catalogue untouched.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
        .context("Failed to create temporary output file")?;
    tmp.write_all(contents.as_bytes())
        .context("Failed to write catalogue")?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move catalogue into place at {}", path.display()))?;
    Ok(())
}

/// One full build: parse the topic index and every `№*.md` card document
/// under `db_dir`, then write the catalogue to `output`. Any malformed input
/// aborts the whole run; nothing partial is written.
pub fn build(db_dir: &Path, topics_file: &Path, output: &Path) -> Result<usize> {
    let topics_text = std::fs::read_to_string(topics_file)
        .with_context(|| format!("Failed to read topic index {}", topics_file.display()))?;
    let index = parse_topics(&topics_text);

    let mut card_paths = Vec::new();
    let entries = std::fs::read_dir(db_dir)
        .with_context(|| format!("Failed to read card directory {}", db_dir.display()))?;
    for entry in entries {
        let path = entry.context("Failed to read directory entry")?.path();
        let is_card = path.extension().is_some_and(|e| e == "md")
            && path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.starts_with(ID_PREFIX));
        if is_card {
            card_paths.push(path);
        }
    }
    card_paths.sort();

    let mut cards = Vec::with_capacity(card_paths.len());
    for path in &card_paths {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read card {}", path.display()))?;
        let card = parse_card(stem, &raw)
            .with_context(|| format!("Failed to parse card {}", path.display()))?;
        cards.push(card);
    }

    let catalog = assemble(cards, &index);
    let rendered = render(&catalog)?;
    write_atomic(output, &rendered)?;

    Ok(catalog.meta.total_cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::parse_card;

    fn card(stem: &str, raw: &str) -> Card {
        parse_card(stem, raw).unwrap()
    }

    #[test]
    fn test_assemble_sorts_cards_by_id() {
        let cards = vec![
            card("№9", "Q9\n---\nA9\n---\n#sql"),
            card("№2", "Q2\n---\nA2\n---\n#python"),
        ];
        let catalog = assemble(cards, &parse_topics(""));
        let ids: Vec<u32> = catalog.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 9]);
    }

    #[test]
    fn test_assemble_attaches_first_matching_topic() {
        let index = parse_topics("## SQL\n[[№7]]\n## Python\n[[№7]]\n");
        let catalog = assemble(vec![card("№7", "Q\n---\nA\n---\n#sql")], &index);
        assert_eq!(catalog.cards[0].topic.as_deref(), Some("SQL"));
    }

    #[test]
    fn test_meta_sets_are_sorted_and_deduplicated() {
        let index = parse_topics("## SQL\n[[№1]] [[№2]]\n## Python\n[[№3]]\n");
        let cards = vec![
            card("№3", "Q\n---\nA\n---\n#x #lvl_3"),
            card("№1", "Q\n---\nA\n---\n#x #lvl_1"),
            card("№2", "Q\n---\nA\n---\n#x #lvl_1"),
        ];
        let catalog = assemble(cards, &index);
        assert_eq!(
            catalog.meta,
            Meta {
                total_cards: 3,
                levels: vec!["lvl_1".to_string(), "lvl_3".to_string()],
                topics: vec!["Python".to_string(), "SQL".to_string()],
            }
        );
    }

    #[test]
    fn test_meta_skips_absent_levels_and_topics() {
        let catalog = assemble(vec![card("№1", "Q\n---\nA\n---\n#x")], &parse_topics(""));
        assert_eq!(catalog.meta.levels, Vec::<String>::new());
        assert_eq!(catalog.meta.topics, Vec::<String>::new());
    }

    #[test]
    fn test_render_keeps_non_ascii_literal() {
        let catalog = assemble(
            vec![card("№1", "Что такое JOIN?\n---\nОтвет.\n---\n#sql")],
            &parse_topics(""),
        );
        let rendered = render(&catalog).unwrap();
        assert!(rendered.contains("Что такое JOIN?"));
        assert!(!rendered.contains("\\u"));
    }

    fn write_fixture(dir: &Path) {
        std::fs::create_dir(dir.join("database")).unwrap();
        std::fs::write(
            dir.join("database/Train to DA.md"),
            "## SQL\n- [[№7]]\n## Python\n- [[№3]]\n",
        )
        .unwrap();
        std::fs::write(dir.join("database/№7.md"), "Q7\n---\nA7\n---\n#sql #lvl_2").unwrap();
        std::fs::write(dir.join("database/№3.md"), "Q3\n---\nA3\n---\n#python #lvl_1").unwrap();
        std::fs::write(dir.join("database/notes.md"), "not a card").unwrap();
    }

    #[test]
    fn test_build_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let output = dir.path().join("data.json");
        let count = build(
            &dir.path().join("database"),
            &dir.path().join("database/Train to DA.md"),
            &output,
        )
        .unwrap();
        assert_eq!(count, 2);

        let data: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(data["meta"]["total_cards"], 2);
        assert_eq!(data["cards"][0]["id"], 3);
        assert_eq!(data["cards"][0]["topic"], "Python");
        assert_eq!(data["cards"][1]["id"], 7);
        assert_eq!(data["cards"][1]["level"], "lvl_2");
    }

    #[test]
    fn test_build_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let output = dir.path().join("data.json");
        let db = dir.path().join("database");
        let topics = dir.path().join("database/Train to DA.md");

        build(&db, &topics, &output).unwrap();
        let first = std::fs::read(&output).unwrap();
        build(&db, &topics, &output).unwrap();
        let second = std::fs::read(&output).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_aborts_on_malformed_card_and_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let output = dir.path().join("data.json");
        let db = dir.path().join("database");
        let topics = dir.path().join("database/Train to DA.md");

        build(&db, &topics, &output).unwrap();
        let before = std::fs::read(&output).unwrap();

        // A card with only two sections is fatal for the whole run.
        std::fs::write(dir.path().join("database/№9.md"), "Q9\n---\nA9").unwrap();
        let err = build(&db, &topics, &output).unwrap_err();
        assert!(format!("{err:#}").contains("№9"));

        let after = std::fs::read(&output).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_build_fails_on_missing_topic_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("database")).unwrap();

        let err = build(
            &dir.path().join("database"),
            &dir.path().join("database/Train to DA.md"),
            &dir.path().join("data.json"),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("topic index"));
    }
}
