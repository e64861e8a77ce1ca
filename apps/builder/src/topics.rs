use std::sync::OnceLock;

use regex::Regex;

/// Topic sections open with a second-level heading.
const HEADING_PREFIX: &str = "## ";

fn reference_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[№(\d+)\]\]").expect("valid regex"))
}

/// Topic → card-id index parsed from the topic document.
///
/// Topics are kept in file order so that an id claimed by several topics
/// resolves to the first one declared, deterministically.
#[derive(Debug)]
pub struct TopicIndex {
    topics: Vec<(String, Vec<u32>)>,
}

impl TopicIndex {
    /// Returns the first topic in file order that references `id`.
    pub fn topic_for(&self, id: u32) -> Option<&str> {
        self.topics
            .iter()
            .find(|(_, ids)| ids.contains(&id))
            .map(|(name, _)| name.as_str())
    }
}

/// Parses the topic index document.
///
/// A `## Name` heading establishes the current topic; any later line in that
/// section containing `[[№N]]` references registers N under the topic.
/// Lines before the first heading are ignored.
pub fn parse_topics(text: &str) -> TopicIndex {
    let mut topics: Vec<(String, Vec<u32>)> = Vec::new();

    for line in text.lines() {
        let line = line.trim();

        if let Some(name) = line.strip_prefix(HEADING_PREFIX) {
            topics.push((name.trim().to_string(), Vec::new()));
        } else if !topics.is_empty() && line.contains("[[") {
            let ids: Vec<u32> = reference_pattern()
                .captures_iter(line)
                .filter_map(|c| c[1].parse().ok())
                .collect();
            if let Some((_, current)) = topics.last_mut() {
                current.extend(ids);
            }
        }
    }

    TopicIndex { topics }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "\
# Train to DA

## SQL
- [[№7]] joins
- [[№8]], [[№9]]

## Python
- [[№9]] list comprehensions
";

    #[test]
    fn test_heading_establishes_topic_for_references() {
        let index = parse_topics(INDEX);
        assert_eq!(index.topic_for(7), Some("SQL"));
    }

    #[test]
    fn test_multiple_references_on_one_line() {
        let index = parse_topics(INDEX);
        assert_eq!(index.topic_for(8), Some("SQL"));
        assert_eq!(index.topic_for(9), Some("SQL"));
    }

    #[test]
    fn test_first_topic_in_file_order_wins() {
        // Card 9 appears under both SQL and Python; SQL is declared first.
        let index = parse_topics(INDEX);
        assert_eq!(index.topic_for(9), Some("SQL"));
    }

    #[test]
    fn test_unreferenced_id_has_no_topic() {
        let index = parse_topics(INDEX);
        assert_eq!(index.topic_for(42), None);
    }

    #[test]
    fn test_references_before_first_heading_ignored() {
        let index = parse_topics("- [[№1]] stray\n## SQL\n- [[№2]]\n");
        assert_eq!(index.topic_for(1), None);
        assert_eq!(index.topic_for(2), Some("SQL"));
    }

    #[test]
    fn test_empty_document() {
        let index = parse_topics("");
        assert_eq!(index.topic_for(1), None);
    }
}
