//! Language dispatch (§4.5) and the detector adapter contract (§4.6).
//!
//! Grounded on `TokenizerClass::tokenizeSentenceElements`'s per-line language
//! switching and `my_textcat.cxx`'s `TextCat` wrapper in
//! `examples/original_source/`; the trait boundary mirrors how the teacher
//! keeps lexeme construction generic over an injected `ILexeme` rather than
//! hard-coding one token grammar.

use crate::token::{LANG_DEFAULT, LANG_UNDETERMINED};
use std::collections::HashMap;

/// Maps a line (or sentence fragment) of text to a language code.
///
/// Implementations may wrap a real n-gram classifier; [`TrigramDetector`] is
/// a minimal built-in used for tests and small-scale callers. The flag that
/// enables detection on a [`Tokenizer`](crate::Tokenizer) can only be set
/// through [`Tokenizer::with_detector`](crate::Tokenizer::with_detector), so
/// detection never silently activates without an adapter in hand.
pub trait LanguageDetector {
    fn detect(&self, text: &str) -> Option<String>;
}

/// A tiny trigram-frequency classifier sufficient for tests and casual use.
/// Production deployments are expected to supply their own
/// [`LanguageDetector`] backed by a real classifier.
#[derive(Default)]
pub struct TrigramDetector {
    profiles: HashMap<String, HashMap<String, u32>>,
}

impl TrigramDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language profile by feeding it representative sample text.
    pub fn train(&mut self, language: &str, sample: &str) {
        let profile = self.profiles.entry(language.to_string()).or_default();
        for trigram in trigrams(&sample.to_lowercase()) {
            *profile.entry(trigram).or_insert(0) += 1;
        }
    }
}

fn trigrams(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 3 {
        return Vec::new();
    }
    (0..=chars.len() - 3)
        .map(|i| chars[i..i + 3].iter().collect())
        .collect()
}

impl LanguageDetector for TrigramDetector {
    fn detect(&self, text: &str) -> Option<String> {
        if self.profiles.is_empty() {
            return None;
        }
        let sample_trigrams = trigrams(&text.to_lowercase());
        if sample_trigrams.is_empty() {
            return None;
        }
        self.profiles
            .iter()
            .map(|(lang, profile)| {
                let score: u32 = sample_trigrams
                    .iter()
                    .filter_map(|t| profile.get(t))
                    .sum();
                (lang.clone(), score)
            })
            .max_by_key(|(_, score)| *score)
            .filter(|(_, score)| *score > 0)
            .map(|(lang, _)| lang)
    }
}

/// Resolve a detected/hinted language code against the set of configured
/// languages, falling back to `und` (if permitted) or `default`.
pub fn resolve_language(
    settings: &HashMap<String, crate::settings::Setting>,
    candidate: Option<&str>,
    allow_und: bool,
) -> String {
    if let Some(code) = candidate {
        if settings.contains_key(code) {
            return code.to_string();
        }
    }
    if allow_und {
        return LANG_UNDETERMINED.to_string();
    }
    LANG_DEFAULT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Setting;

    #[test]
    fn untrained_detector_declines_to_guess() {
        let detector = TrigramDetector::new();
        assert_eq!(detector.detect("hello world"), None);
    }

    #[test]
    fn short_sample_has_no_trigrams_to_score() {
        let mut detector = TrigramDetector::new();
        detector.train("eng", "the quick brown fox");
        assert_eq!(detector.detect("ab"), None);
    }

    #[test]
    fn detector_picks_the_closer_trained_profile() {
        let mut detector = TrigramDetector::new();
        detector.train("eng", "the quick brown fox jumps over the lazy dog");
        detector.train("nld", "de snelle bruine vos springt over de luie hond");
        assert_eq!(detector.detect("the quick brown fox"), Some("eng".to_string()));
        assert_eq!(detector.detect("de snelle bruine vos"), Some("nld".to_string()));
    }

    fn settings_map(languages: &[&str]) -> HashMap<String, Setting> {
        languages
            .iter()
            .map(|l| (l.to_string(), Setting::empty(*l)))
            .collect()
    }

    #[test]
    fn configured_candidate_is_used_verbatim() {
        let settings = settings_map(&["eng", "nld"]);
        assert_eq!(resolve_language(&settings, Some("nld"), true), "nld");
    }

    #[test]
    fn unconfigured_candidate_falls_back_to_und_when_allowed() {
        let settings = settings_map(&["eng"]);
        assert_eq!(resolve_language(&settings, Some("fra"), true), LANG_UNDETERMINED);
    }

    #[test]
    fn unconfigured_candidate_falls_back_to_default_when_und_disallowed() {
        let settings = settings_map(&["eng"]);
        assert_eq!(resolve_language(&settings, Some("fra"), false), LANG_DEFAULT);
    }

    #[test]
    fn no_candidate_falls_back_to_default_without_und() {
        let settings = settings_map(&["eng"]);
        assert_eq!(resolve_language(&settings, None, false), LANG_DEFAULT);
    }
}
