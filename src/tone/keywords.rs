//! Case-insensitive keyword matching shared by the transformer and composer.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};

/// A fixed set of keywords matched as case-insensitive substrings.
pub struct KeywordSet {
    words: &'static [&'static str],
    automaton: Option<AhoCorasick>,
}

impl KeywordSet {
    pub fn new(words: &'static [&'static str]) -> Self {
        let automaton = match AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(words)
        {
            Ok(ac) => Some(ac),
            // Only reachable past aho-corasick's automaton size limits
            Err(e) => {
                tracing::warn!("Keyword automaton build failed, using plain search: {}", e);
                None
            }
        };
        Self { words, automaton }
    }

    /// Whether any keyword occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        match &self.automaton {
            Some(ac) => ac.is_match(text),
            None => {
                let lower = text.to_lowercase();
                self.words.iter().any(|w| lower.contains(&w.to_lowercase()))
            }
        }
    }
}
