// Text-level lemmatization: split a text into word tokens and analyze each,
// tracking which tokens open a sentence.

use crate::analyzer::Analyzer;
use crate::types::TokenAnalyses;

/// Characters that can appear inside a Latin word token: ASCII letters, the
/// Latin-1 supplement, Latin Extended-A/B, and combining diacritics.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || ('\u{00C0}'..='\u{00FF}').contains(&c)
        || ('\u{0100}'..='\u{024F}').contains(&c)
        || ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Punctuation that closes a sentence.
fn is_sentence_punct(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | ';' | ':')
}

impl Analyzer {
    /// Lemmatize every word token of `text`. A token counts as
    /// sentence-initial when it is the first token or when sentence
    /// punctuation occurs within the five code points before it.
    pub fn lemmatize_text(&self, text: &str) -> Vec<TokenAnalyses> {
        let chars: Vec<char> = text.chars().collect();
        let mut results = Vec::new();
        let mut i = 0;
        let mut first = true;
        while i < chars.len() {
            if !is_word_char(chars[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            let token: String = chars[start..i].iter().collect();
            let lookback = start.saturating_sub(5);
            let sentence_start =
                first || chars[lookback..start].iter().copied().any(is_sentence_punct);
            first = false;
            let analyses = self.lemmatize(&token, sentence_start);
            results.push(TokenAnalyses { token, analyses });
        }
        results
    }
}
