//! Repair of letter/number confusions typical for OCR output.
//!
//! Each whitespace-separated token is classified by whether digits or letters
//! dominate; the minority characters that commonly get confused with the
//! majority class are rewritten. Tokens with as many digits as letters are
//! left alone since there is no way to tell which reading is right.

use std::borrow::Cow;

fn letter_as_digit(c: char) -> Option<char> {
    match c {
        'O' | 'o' | 'Q' | 'D' => Some('0'),
        'I' | 'l' | 'i' | '|' => Some('1'),
        'Z' | 'z' => Some('2'),
        'S' | 's' => Some('5'),
        'G' => Some('6'),
        'B' => Some('8'),
        'g' | 'q' => Some('9'),
        _ => None,
    }
}

fn digit_as_letter(c: char, uppercase: bool) -> Option<char> {
    let (upper, lower) = match c {
        '0' => ('O', 'o'),
        '1' => ('I', 'l'),
        '5' => ('S', 's'),
        '8' => ('B', 'B'),
        _ => return None,
    };
    Some(if uppercase { upper } else { lower })
}

fn fix_token(token: &str) -> Option<String> {
    let digits = token.chars().filter(char::is_ascii_digit).count();
    let letters = token.chars().filter(|c| c.is_alphabetic()).count();

    if digits > letters && (letters > 0 || token.contains('|')) {
        return Some(token.chars().map(|c| letter_as_digit(c).unwrap_or(c)).collect());
    }

    if letters > digits && digits > 0 {
        let uppercase = token.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
        return Some(
            token
                .chars()
                .map(|c| digit_as_letter(c, uppercase).unwrap_or(c))
                .collect(),
        );
    }

    None
}

/// Rewrites confused letters and digits in every token of `text`.
///
/// Whitespace is preserved as-is. Returns the input unchanged (borrowed) when
/// nothing had to be fixed.
pub fn fix_letter_number_errors(text: &str) -> Cow<'_, str> {
    let mut fixed: Option<String> = None;
    let mut consumed = 0;

    for piece in text.split_inclusive(char::is_whitespace) {
        let token = piece.trim_end_matches(char::is_whitespace);
        let trailing = &piece[token.len()..];

        match fix_token(token) {
            Some(replacement) if replacement != token => {
                let out = fixed.get_or_insert_with(|| text[..consumed].to_string());
                out.push_str(&replacement);
                out.push_str(trailing);
            }
            _ => {
                if let Some(out) = fixed.as_mut() {
                    out.push_str(piece);
                }
            }
        }
        consumed += piece.len();
    }

    match fixed {
        Some(out) => Cow::Owned(out),
        None => Cow::Borrowed(text),
    }
}
