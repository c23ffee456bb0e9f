// ============================================================
// Layer 4 - Text Preprocessor
// ============================================================
// Normalises raw sentences into the canonical token form the
// vocabulary was built from.
//
// Cleaning steps (applied in order):
//   1. Every char outside [A-Za-z0-9(),!?'`] becomes a space
//   2. Contraction suffixes split off: 's 've n't 're 'd 'll
//   3. , ! ( ) ? get a space on each side
//   4. Runs of 2+ whitespace collapse to one space
//   5. Trim both ends, then lowercase
//
// Example:
//   "It's great, isn't it?"  →  "it 's great , is n't it ?"
//
// The transform is pure and total: any &str maps to a String.

use std::sync::LazyLock;

use regex::Regex;

static NON_TOKEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9(),!?'`]").expect("valid regex"));

static CONTRACTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"('s|'ve|n't|'re|'d|'ll)").expect("valid regex"));

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,!()?])").expect("valid regex"));

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Stateless sentence normaliser.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one sentence.
    pub fn clean(&self, text: &str) -> String {
        let step1 = NON_TOKEN_CHARS.replace_all(text, " ");
        let step2 = CONTRACTIONS.replace_all(&step1, " $1");
        let step3 = PUNCTUATION.replace_all(&step2, " $1 ");
        let step4 = WHITESPACE_RUNS.replace_all(&step3, " ");

        // Only ASCII survives step 1, so ASCII lowercasing is exact
        step4.trim().to_ascii_lowercase()
    }

    /// Clean every sentence, preserving order.
    pub fn clean_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|t| self.clean(t.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_contractions_and_punctuation() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("It's great, isn't it?"), "it 's great , is n't it ?");
    }

    #[test]
    fn test_all_contraction_suffixes() {
        let p = Preprocessor::new();
        assert_eq!(
            p.clean("we've they're he'd you'll"),
            "we 've they 're he 'd you 'll"
        );
    }

    #[test]
    fn test_brackets_and_bang() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("(Wow)!"), "( wow ) !");
    }

    #[test]
    fn test_disallowed_chars_become_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("a.b;c\td\u{00e9}e"), "a b c d e");
    }

    #[test]
    fn test_collapses_and_trims() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("   Hello \n\n  WORLD   "), "hello world");
    }

    #[test]
    fn test_backtick_kept() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("``quoted``"), "``quoted``");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
        assert_eq!(p.clean("...;;;"), "");
    }

    #[test]
    fn test_clean_all_keeps_order() {
        let p = Preprocessor::new();
        let out = p.clean_all(&["B!", "a"]);
        assert_eq!(out, vec!["b !".to_string(), "a".to_string()]);
    }
}
