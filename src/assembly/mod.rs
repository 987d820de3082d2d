//! Text assembly under a word budget
//!
//! Generated headline payloads are parsed into short text items which are then
//! trimmed to fit the rendered section's word budget.

pub mod word_budget;
pub mod headlines;
pub mod generator;

pub use word_budget::{assemble, count_words, Assembly, TextItem, WordBudgetAssembler, WordBudgetConfig};
pub use headlines::{extract_headlines_fallback, parse_headlines, parse_or_extract, ParseFailure};
pub use generator::{ExcerptHeadlineGenerator, GenerationError, HeadlineGenerator};
