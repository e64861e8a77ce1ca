use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Serialize;

/// Card files are named `№<id>.md`; the same marker prefixes ids in the
/// topic index.
pub const ID_PREFIX: char = '№';

/// Delimiter between the question, answer and tag sections of a card file.
pub const SECTION_DELIMITER: &str = "---";

/// One flashcard as it appears in the catalogue. Constructed once per source
/// file and never mutated afterwards; `topic` is filled in during assembly.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Card {
    pub id: u32,
    pub question: String,
    pub answer: String,
    pub tags: Vec<String>,
    pub level: Option<String>,
    pub topic: Option<String>,
}

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#(\w+)").expect("valid regex"))
}

fn level_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#(lvl_\d)").expect("valid regex"))
}

/// Parses the numeric id out of a card file stem such as `№7`.
pub fn parse_id(stem: &str) -> Result<u32> {
    stem.trim_start_matches(ID_PREFIX)
        .parse::<u32>()
        .with_context(|| format!("Card file name '{stem}' does not contain a numeric id"))
}

/// Parses one card document.
///
/// The document must split into at least three sections: question, answer,
/// tag block. Anything after the third delimiter is ignored. Level markers
/// (`#lvl_N`) are captured separately and excluded from the tag set.
pub fn parse_card(stem: &str, raw: &str) -> Result<Card> {
    let parts: Vec<&str> = raw.trim().split(SECTION_DELIMITER).map(str::trim).collect();

    if parts.len() < 3 {
        bail!("Card '{stem}' is malformed: expected question/answer/tags sections");
    }

    let tags_raw = parts[2];

    let level = level_pattern()
        .captures(tags_raw)
        .map(|c| c[1].to_string());

    let tags: Vec<String> = tag_pattern()
        .captures_iter(tags_raw)
        .map(|c| c[1].to_string())
        .filter(|t| !t.starts_with("lvl"))
        .collect();

    Ok(Card {
        id: parse_id(stem)?,
        question: parts[0].to_string(),
        answer: parts[1].to_string(),
        tags,
        level,
        topic: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_card_three_sections() {
        let card = parse_card("№7", "Q?\n---\nA.\n---\n#sql #lvl_2").unwrap();
        assert_eq!(card.id, 7);
        assert_eq!(card.question, "Q?");
        assert_eq!(card.answer, "A.");
        assert_eq!(card.tags, vec!["sql"]);
        assert_eq!(card.level.as_deref(), Some("lvl_2"));
        assert_eq!(card.topic, None);
    }

    #[test]
    fn test_parse_card_without_level_marker() {
        let card = parse_card("№3", "Q?\n---\nA.\n---\n#python #pandas").unwrap();
        assert_eq!(card.tags, vec!["python", "pandas"]);
        assert_eq!(card.level, None);
    }

    #[test]
    fn test_parse_card_two_sections_is_fatal() {
        let err = parse_card("№9", "Q?\n---\nA.").unwrap_err();
        assert!(err.to_string().contains("№9"));
    }

    #[test]
    fn test_parse_card_preserves_non_ascii_text() {
        let card = parse_card("№12", "Что такое JOIN?\n---\nСоединение таблиц.\n---\n#sql").unwrap();
        assert_eq!(card.question, "Что такое JOIN?");
        assert_eq!(card.answer, "Соединение таблиц.");
    }

    #[test]
    fn test_parse_card_sections_are_trimmed() {
        let card = parse_card("№1", "  Q?  \n---\n\nA.\n\n---\n #sql ").unwrap();
        assert_eq!(card.question, "Q?");
        assert_eq!(card.answer, "A.");
    }

    #[test]
    fn test_parse_card_extra_sections_ignored() {
        let card = parse_card("№2", "Q?\n---\nA.\n---\n#sql\n---\nscratch notes").unwrap();
        assert_eq!(card.tags, vec!["sql"]);
    }

    #[test]
    fn test_parse_id_rejects_non_numeric_stem() {
        assert!(parse_id("№draft").is_err());
    }
}
