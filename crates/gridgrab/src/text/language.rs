//! Joining and reading-direction rules derived from a language tag.
//!
//! Accepts BCP-47 tags (`zh-Hans-CN`, `ar`, `ku-Arab`) as well as Tesseract
//! language codes (`chi_sim`, `ara`, `aze_cyrl`).

use ahash::AHashSet;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static NON_SPACE_JOINING_LANGUAGES: Lazy<AHashSet<&'static str>> =
    Lazy::new(|| ["zh", "zho", "chi", "ja", "jpn"].into_iter().collect());

static RTL_LANGUAGES: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    [
        "ar", "ara", "he", "iw", "heb", "fa", "fas", "per", "ur", "urd", "ps", "pus", "yi", "yid", "dv", "div", "ug",
        "uig", "sd", "snd", "syr", "ckb",
    ]
    .into_iter()
    .collect()
});

static RTL_SCRIPTS: Lazy<AHashSet<&'static str>> =
    Lazy::new(|| ["arab", "hebr", "thaa", "syrc", "nkoo", "adlm", "rohg"].into_iter().collect());

/// How recognized words of a language are put back together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProfile {
    /// Words are separated by spaces (false for Chinese and Japanese).
    pub is_space_joining: bool,
    /// Lines read right to left; word order gets reversed after joining.
    pub is_right_to_left: bool,
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self {
            is_space_joining: true,
            is_right_to_left: false,
        }
    }
}

impl LanguageProfile {
    /// Derives the profile for `tag`. Unknown or empty tags get the default
    /// (space-joining, left-to-right) profile.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_lowercase();
        let mut subtags = normalized.split(['-', '_']).filter(|s| !s.is_empty());

        let Some(primary) = subtags.next() else {
            return Self::default();
        };

        let script = subtags.find(|s| s.len() == 4 && s.chars().all(|c| c.is_ascii_alphabetic()));
        let is_right_to_left = match script {
            Some(script) => RTL_SCRIPTS.contains(script),
            None => RTL_LANGUAGES.contains(primary),
        };

        Self {
            is_space_joining: !NON_SPACE_JOINING_LANGUAGES.contains(primary),
            is_right_to_left,
        }
    }

    /// Applies a configured space-joining override, if any.
    pub fn with_space_joining(mut self, space_joining: Option<bool>) -> Self {
        if let Some(value) = space_joining {
            self.is_space_joining = value;
        }
        self
    }
}
