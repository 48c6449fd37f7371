use std::collections::HashMap;

use serde::Serialize;

/// Grammatical category of a lemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Pronoun,
    Adverb,
    Conjunction,
    Exclamation,
    Interjection,
    Numeral,
    Preposition,
    Unknown,
}

impl PartOfSpeech {
    /// Map a `pos:` directive character to a category.
    pub fn from_code(code: char) -> Self {
        match code {
            'n' => Self::Noun,
            'v' => Self::Verb,
            'a' => Self::Adjective,
            'p' => Self::Pronoun,
            'd' => Self::Adverb,
            'c' => Self::Conjunction,
            'e' => Self::Exclamation,
            'i' => Self::Interjection,
            'm' => Self::Numeral,
            'r' => Self::Preposition,
            _ => Self::Unknown,
        }
    }
}

/// Index of a model in the analyzer's model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub(crate) u32);

/// Index of a lemma in the analyzer's lemma arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LemmaId(pub(crate) u32);

/// Index of an ending in the analyzer's ending arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndingId(pub(crate) u32);

/// Index of a radical in the analyzer's radical arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RadicalId(pub(crate) u32);

/// Index of an irregular form in the analyzer's irregular arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IrregId(pub(crate) u32);

/// A single morphological analysis of a surface form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// The reconstructed form with vowel-quantity marks.
    pub form: String,
    /// Human-readable morphological description (e.g. "génitif singulier").
    pub morpho: String,
    /// 1-based index into the morphological-description table.
    pub morpho_index: usize,
}

/// Every analysis found for a form, grouped by lemma. Duplicates within a
/// list reflect genuine ambiguities and are kept.
pub type Analyses = HashMap<LemmaId, Vec<Analysis>>;

/// All analyses for one token of a lemmatized text.
#[derive(Debug, Clone)]
pub struct TokenAnalyses {
    /// The token as it appeared in the text.
    pub token: String,
    pub analyses: Analyses,
}

/// The full inflection paradigm of a lemma.
#[derive(Debug, Clone)]
pub struct InflectionTable {
    pub lemma: LemmaId,
    /// Morphological slot (1-based) to the inflected forms at that slot,
    /// deduplicated, first-seen order.
    pub cells: HashMap<usize, Vec<String>>,
}
