//! Search-driven word selection.
//!
//! Selected words are what the table assembler and the plain-text fallback
//! emit; with no selection everything is emitted.

use crate::types::Word;

/// Marks the words matching `query` as selected and deselects the rest.
///
/// `exact` compares whole texts case-sensitively; otherwise a case-insensitive
/// substring match is used. A blank query clears the selection. Returns the
/// number of selected words.
pub fn select_matches(words: &mut [Word], query: &str, exact: bool) -> usize {
    if query.trim().is_empty() {
        for word in words.iter_mut() {
            word.selected = false;
        }
        return 0;
    }

    let needle = query.to_lowercase();
    let mut matches = 0;
    for word in words.iter_mut() {
        word.selected = if exact {
            word.text == query
        } else {
            word.text.to_lowercase().contains(&needle)
        };
        if word.selected {
            matches += 1;
        }
    }

    tracing::debug!("search {:?} (exact: {}) selected {} of {} words", query, exact, matches, words.len());
    matches
}

/// Words that are currently selected, or all words when nothing is selected.
pub fn selected_or_all(words: &[Word]) -> Vec<&Word> {
    let selected: Vec<&Word> = words.iter().filter(|word| word.selected).collect();
    if selected.is_empty() {
        words.iter().collect()
    } else {
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn words() -> Vec<Word> {
        ["Invoice", "invoice total", "Total", "Date"]
            .iter()
            .enumerate()
            .map(|(i, text)| Word::new(*text, Rect::from_xywh(0.0, i as f64 * 20.0, 50.0, 10.0), i as i32))
            .collect()
    }

    #[test]
    fn test_substring_match_ignores_case() {
        let mut words = words();
        assert_eq!(select_matches(&mut words, "INVOICE", false), 2);
        assert!(words[0].selected && words[1].selected);
        assert!(!words[2].selected && !words[3].selected);
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let mut words = words();
        assert_eq!(select_matches(&mut words, "Total", true), 1);
        assert!(words[2].selected);
        assert_eq!(select_matches(&mut words, "total", true), 0);
        assert!(!words[2].selected);
    }

    #[test]
    fn test_blank_query_clears_selection() {
        let mut words = words();
        select_matches(&mut words, "date", false);
        assert_eq!(select_matches(&mut words, "   ", false), 0);
        assert!(words.iter().all(|word| !word.selected));
    }

    #[test]
    fn test_selected_or_all() {
        let mut words = words();
        assert_eq!(selected_or_all(&words).len(), 4);
        select_matches(&mut words, "date", false);
        let selected = selected_or_all(&words);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].text, "Date");
    }
}
