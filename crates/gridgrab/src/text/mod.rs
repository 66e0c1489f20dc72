//! Text side of post-processing: joining words into lines, language rules,
//! OCR error repair and search selection.
pub mod corrections;
pub mod joiner;
pub mod language;
pub mod search;

pub use corrections::fix_letter_number_errors;
pub use joiner::{join, join_line, join_lines, join_tokens, reverse_words_rtl, wants_space};
pub use language::LanguageProfile;
pub use search::{select_matches, selected_or_all};
