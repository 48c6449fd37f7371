pub mod analyzer;
pub mod errors;
pub mod flexion;
pub mod lemmatize;
pub mod lexicon;
pub mod model;
pub mod normalize;
pub mod output;
pub mod sentence;
pub mod types;

pub use analyzer::Analyzer;
pub use errors::LoadError;
pub use types::{Analyses, Analysis, InflectionTable, LemmaId, PartOfSpeech, TokenAnalyses};
