//! Word budget enforcement for assembled text sections
//!
//! Items are taken in order until the budget runs out. The item that crosses
//! the boundary is cut to the remaining words and marked with an ellipsis,
//! after which assembly stops.

use crate::error::{DigestError, Result};
use crate::metrics::METRICS;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Short text fragment, e.g. one headline bullet.
///
/// The word count always matches `text`; deserialized items recount it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTextItem")]
pub struct TextItem {
    pub text: String,
    word_count: usize,
    /// Candidate the text was generated for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

#[derive(Deserialize)]
struct RawTextItem {
    text: String,
    #[serde(default)]
    source_id: Option<String>,
}

impl From<RawTextItem> for TextItem {
    fn from(raw: RawTextItem) -> Self {
        Self {
            source_id: raw.source_id,
            ..Self::new(raw.text)
        }
    }
}

impl TextItem {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let word_count = count_words(&text);
        Self {
            text,
            word_count,
            source_id: None,
        }
    }

    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Word budget configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBudgetConfig {
    #[serde(default = "default_word_budget")]
    pub word_budget: usize,

    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// A boundary item is truncated only when more words than this remain
    #[serde(default)]
    pub min_truncation_words: usize,

    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
}

fn default_word_budget() -> usize {
    120
}

fn default_max_items() -> usize {
    8
}

fn default_ellipsis() -> String {
    "...".to_string()
}

impl WordBudgetConfig {
    /// The ellipsis must stay glued to the last kept word so that truncated
    /// output counts the same number of words when assembled again.
    pub fn validate(&self) -> Result<()> {
        if self.ellipsis.is_empty() || self.ellipsis.chars().any(char::is_whitespace) {
            return Err(DigestError::Configuration(format!(
                "ellipsis {:?} must be non-empty and contain no whitespace",
                self.ellipsis
            )));
        }
        Ok(())
    }
}

impl Default for WordBudgetConfig {
    fn default() -> Self {
        Self {
            word_budget: default_word_budget(),
            max_items: default_max_items(),
            min_truncation_words: 0,
            ellipsis: default_ellipsis(),
        }
    }
}

/// Assembled section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assembly {
    pub items: Vec<TextItem>,
    pub words_used: usize,
    pub truncated: bool,
}

/// Word-budgeted assembler
#[derive(Debug, Clone, Default)]
pub struct WordBudgetAssembler {
    config: WordBudgetConfig,
}

impl WordBudgetAssembler {
    pub fn new(config: WordBudgetConfig) -> Self {
        Self { config }
    }

    pub fn with_limits(word_budget: usize, max_items: usize) -> Self {
        Self::new(WordBudgetConfig {
            word_budget,
            max_items,
            ..WordBudgetConfig::default()
        })
    }

    pub fn config(&self) -> &WordBudgetConfig {
        &self.config
    }

    /// Longest prefix that fits, with a truncated boundary item
    pub fn assemble(&self, items: &[TextItem]) -> Vec<TextItem> {
        self.assemble_detailed(items).items
    }

    pub fn assemble_detailed(&self, items: &[TextItem]) -> Assembly {
        let budget = self.config.word_budget;
        let mut assembly = Assembly::default();

        for item in items {
            if assembly.items.len() >= self.config.max_items {
                break;
            }

            let words: Vec<&str> = item.text.split_whitespace().collect();
            debug_assert_eq!(words.len(), item.word_count);
            if assembly.words_used + words.len() <= budget {
                assembly.words_used += words.len();
                assembly.items.push(item.clone());
                continue;
            }

            let remaining = budget - assembly.words_used;
            if remaining > self.config.min_truncation_words {
                let text = format!("{}{}", words[..remaining].join(" "), self.config.ellipsis);
                assembly.items.push(TextItem {
                    source_id: item.source_id.clone(),
                    ..TextItem::new(text)
                });
                assembly.words_used += remaining;
                assembly.truncated = true;
            }
            break;
        }

        METRICS.record_assembly(assembly.words_used, assembly.truncated);
        debug!(
            "Assembled {} of {} items using {}/{} words",
            assembly.items.len(),
            items.len(),
            assembly.words_used,
            budget
        );

        assembly
    }
}

/// Assemble with default truncation settings
pub fn assemble(items: &[TextItem], word_budget: usize, max_items: usize) -> Vec<TextItem> {
    WordBudgetAssembler::with_limits(word_budget, max_items).assemble(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(texts: &[&str]) -> Vec<TextItem> {
        texts.iter().map(|t| TextItem::new(*t)).collect()
    }

    fn texts(items: &[TextItem]) -> Vec<&str> {
        items.iter().map(|i| i.text.as_str()).collect()
    }

    #[test]
    fn test_truncates_boundary_item() {
        let result = assemble(&items(&["alpha beta gamma", "delta epsilon"]), 4, 5);
        assert_eq!(texts(&result), vec!["alpha beta gamma", "delta..."]);
        assert_eq!(result.iter().map(|i| i.word_count()).sum::<usize>(), 4);
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble(&[], 10, 5).is_empty());
    }

    #[test]
    fn test_stops_after_truncation_even_if_later_items_fit() {
        let result = assemble(&items(&["one two", "three four five six", "seven"]), 4, 10);
        assert_eq!(texts(&result), vec!["one two", "three four..."]);
    }

    #[test]
    fn test_min_truncation_words_drops_boundary_item() {
        let assembler = WordBudgetAssembler::new(WordBudgetConfig {
            word_budget: 5,
            max_items: 10,
            min_truncation_words: 3,
            ..WordBudgetConfig::default()
        });
        let result = assembler.assemble_detailed(&items(&["a b c", "d e f g", "h"]));
        assert_eq!(texts(&result.items), vec!["a b c"]);
        assert!(!result.truncated);
        assert_eq!(result.words_used, 3);
    }

    #[test]
    fn test_max_items() {
        let result = assemble(&items(&["a", "b", "c"]), 100, 2);
        assert_eq!(texts(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_zero_budget() {
        assert!(assemble(&items(&["a b"]), 0, 5).is_empty());
        assert_eq!(assemble(&items(&["", "a"]), 0, 5).len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let input = items(&["first headline here", "second one", "third headline is long"]);
        let once = assemble(&input, 7, 3);
        let twice = assemble(&once, 7, 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_idempotent_with_custom_marker_and_threshold() {
        let input = items(&["one two three", "four five six seven eight", "nine"]);
        for ellipsis in ["\u{2026}", "[more]", "..."] {
            for min_truncation_words in 0..4 {
                let assembler = WordBudgetAssembler::new(WordBudgetConfig {
                    word_budget: 6,
                    max_items: 5,
                    min_truncation_words,
                    ellipsis: ellipsis.to_string(),
                });
                assert!(assembler.config().validate().is_ok());

                let once = assembler.assemble_detailed(&input);
                assert!(once.words_used <= 6);
                let recounted: usize = once.items.iter().map(|i| count_words(&i.text)).sum();
                assert_eq!(recounted, once.words_used);
                assert_eq!(assembler.assemble(&once.items), once.items);
            }
        }
    }

    #[test]
    fn test_ellipsis_with_whitespace_rejected() {
        for ellipsis in ["", " ...", "..\t."] {
            let config = WordBudgetConfig {
                ellipsis: ellipsis.to_string(),
                ..WordBudgetConfig::default()
            };
            assert!(matches!(config.validate(), Err(DigestError::Configuration(_))));
        }
    }

    #[test]
    fn test_deserialized_item_recounts_words() {
        let item: TextItem =
            serde_json::from_str(r#"{"text":"three small words","word_count":99}"#).unwrap();
        assert_eq!(item.word_count(), 3);
        assert_eq!(item, TextItem::new("three small words"));
    }

    #[test]
    fn test_source_id_survives_truncation() {
        let input = vec![TextItem::new("a b c d").with_source("rec-9")];
        let result = assemble(&input, 2, 3);
        assert_eq!(result[0].text, "a b...");
        assert_eq!(result[0].source_id.as_deref(), Some("rec-9"));
    }
}
