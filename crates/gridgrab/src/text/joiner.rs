//! Language-aware joining of recognized words into line text.
//!
//! Space-joining scripts (Latin, Cyrillic, ...) separate every word with a
//! single space. For scripts whose tokens are mostly single ideographs (Chinese,
//! Japanese) a space is only inserted next to tokens that look like words of a
//! space-joining script: a token starting with a letter that is not an "other
//! letter", a token ending with a decimal digit, or any token of two or more
//! characters. Lone ideographs and single punctuation marks fuse with their
//! neighbours.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::corrections::fix_letter_number_errors;
use super::language::LanguageProfile;
use crate::types::{Line, Word};

static SPACE_WANTING_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^[\p{L}--\p{Lo}]|\p{Nd}$)|.{2,}")
        .expect("Space-wanting word regex pattern is valid and should compile")
});

/// Whether `token` should be separated from its neighbours by a space when
/// joining in a non-space-joining language.
pub fn wants_space(token: &str) -> bool {
    SPACE_WANTING_WORD.is_match(token)
}

/// Joins tokens in order.
///
/// With `is_space_joining` every pair is separated by exactly one space.
/// Otherwise two adjacent tokens fuse only when neither [`wants_space`].
pub fn join_tokens<'a, I>(tokens: I, is_space_joining: bool) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut text = String::new();
    let mut is_first = true;
    let mut prev_wants_space = false;

    for token in tokens {
        if is_space_joining {
            if !is_first {
                text.push(' ');
            }
        } else {
            let this_wants_space = wants_space(token);
            if !is_first && (this_wants_space || prev_wants_space) {
                text.push(' ');
            }
            prev_wants_space = this_wants_space;
        }
        text.push_str(token);
        is_first = false;
    }

    text
}

/// Joins the texts of `words` in their original order.
pub fn join(words: &[Word], is_space_joining: bool) -> String {
    join_tokens(words.iter().map(|word| word.text.as_str()), is_space_joining)
}

/// Joins one OCR line, optionally repairing letter/number confusions in each
/// word before it is classified.
pub fn join_line(line: &Line, is_space_joining: bool, correct_errors: bool) -> String {
    if !correct_errors {
        return join(&line.words, is_space_joining);
    }

    let fixed: Vec<Cow<'_, str>> = line
        .words
        .iter()
        .map(|word| fix_letter_number_errors(&word.text))
        .collect();
    join_tokens(fixed.iter().map(|token| token.as_ref()), is_space_joining)
}

/// Joins every line of a page, one `\n`-terminated line of output per OCR
/// line, then reorders words for right-to-left languages.
pub fn join_lines(lines: &[Line], profile: &LanguageProfile, correct_errors: bool) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&join_line(line, profile.is_space_joining, correct_errors));
        text.push('\n');
    }

    if profile.is_right_to_left {
        reverse_words_rtl(&text)
    } else {
        text
    }
}

/// Reverses the word order of every line in `text`.
///
/// Lines end at `\n`, `\r` or `\r\n`. The words of each line are re-joined in
/// reverse with the non-space-joining adjacency rule, evaluated on the new
/// order. Every output line, blank ones included, ends with `\n`.
pub fn reverse_words_rtl(text: &str) -> String {
    let mut reversed = String::with_capacity(text.len() + 1);
    for line in split_lines(text) {
        reversed.push_str(&join_tokens(line.split_whitespace().rev(), false));
        reversed.push('\n');
    }
    reversed
}

fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(pos) => {
                lines.push(&rest[..pos]);
                let terminator = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + terminator..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}
