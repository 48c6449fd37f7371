// The analyzer: owns every loaded entity in flat arenas, with string indexes
// for lookup. Built once from a data directory and immutable afterwards, so
// queries can run from any number of threads.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{LoadError, Result};
use crate::lexicon::{Irreg, Lemma, Radical};
use crate::model::{Ending, Model};
use crate::normalize::{atone, normalize_key};
use crate::types::{EndingId, IrregId, LemmaId, ModelId, RadicalId};

#[derive(Debug)]
pub struct Analyzer {
    /// Morphological descriptions, 1-based; index 0 is an unused placeholder.
    pub(crate) morphos: Vec<String>,
    pub(crate) models: Vec<Model>,
    pub(crate) model_index: HashMap<String, ModelId>,
    pub(crate) lemmas: Vec<Lemma>,
    /// Normalized key to lemma. A duplicate key shadows the earlier entry
    /// here, but the earlier lemma stays reachable through its radicals.
    pub(crate) lemma_index: HashMap<String, LemmaId>,
    pub(crate) endings: Vec<Ending>,
    pub(crate) ending_index: HashMap<String, Vec<EndingId>>,
    pub(crate) radicals: Vec<Radical>,
    pub(crate) radical_index: HashMap<String, Vec<RadicalId>>,
    pub(crate) irregs: Vec<Irreg>,
    pub(crate) irreg_index: HashMap<String, Vec<IrregId>>,
    /// `$name=value` substitutions from the paradigm file.
    pub(crate) variables: HashMap<String, String>,
    /// Language code to language name, from the translation files.
    pub(crate) languages: HashMap<String, String>,
    /// Prefix substitutions (unassimilated to assimilated), file order,
    /// stored without quantity marks.
    pub(crate) assims: Vec<(String, String)>,
    /// Suffix substitutions (contracted to full), file order.
    pub(crate) contractions: Vec<(String, String)>,
}

impl Analyzer {
    /// Load every data file from `data_dir`. Missing or unreadable required
    /// files fail with a [`LoadError`] naming the file; malformed lines
    /// inside readable files are skipped.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref();
        let mut analyzer = Self::empty();
        analyzer.load_assims_str(&read_required(dir.join("assimilations.la"))?);
        analyzer.load_contractions_str(&read_required(dir.join("contractions.la"))?);
        analyzer.load_morphos_str(&read_morphos(dir)?);
        analyzer.load_models_str(&read_required(dir.join("modeles.la"))?);
        analyzer.load_lexicon_str(&read_required(dir.join("lemmes.la"))?);
        analyzer.load_translation_files(dir);
        analyzer.load_irregs_str(&read_required(dir.join("irregs.la"))?);
        Ok(analyzer)
    }

    pub(crate) fn empty() -> Self {
        Self {
            morphos: vec![String::new()],
            models: Vec::new(),
            model_index: HashMap::new(),
            lemmas: Vec::new(),
            lemma_index: HashMap::new(),
            endings: Vec::new(),
            ending_index: HashMap::new(),
            radicals: Vec::new(),
            radical_index: HashMap::new(),
            irregs: Vec::new(),
            irreg_index: HashMap::new(),
            variables: HashMap::new(),
            languages: HashMap::new(),
            assims: Vec::new(),
            contractions: Vec::new(),
        }
    }

    /// Parse the morphological-description list: `N:DESCRIPTION` per line,
    /// terminated by a `! --- ` separator. Descriptions are stored in file
    /// order; the leading index is informative only.
    pub(crate) fn load_morphos_str(&mut self, text: &str) {
        for line in text.lines() {
            if line.starts_with("! --- ") {
                break;
            }
            if line.starts_with('!') {
                continue;
            }
            let Some((_, description)) = line.split_once(':') else {
                continue;
            };
            self.morphos.push(description.to_string());
        }
    }

    /// Parse the assimilation table: `KEY:VALUE` per line, both stored
    /// without quantity marks.
    pub(crate) fn load_assims_str(&mut self, text: &str) {
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            self.assims.push((atone(key), atone(value)));
        }
    }

    /// Parse the contraction table: `KEY:VALUE` per line, stored verbatim
    /// (contractions are matched with their marks).
    pub(crate) fn load_contractions_str(&mut self, text: &str) {
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            self.contractions.push((key.to_string(), value.to_string()));
        }
    }

    /// Load every `lemmes.XX` translation file found next to the lexicon.
    /// These are optional: unreadable files are skipped.
    fn load_translation_files(&mut self, dir: &Path) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();
        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(lang) = name.strip_prefix("lemmes.") else {
                continue;
            };
            if lang == "la" || lang.is_empty() {
                continue;
            }
            let Ok(text) = fs::read_to_string(&path) else {
                continue;
            };
            self.load_translations_str(lang, &text);
        }
    }

    /// Morphological description at 1-based `slot`, or the empty string when
    /// the slot is out of range.
    pub fn morpho(&self, slot: usize) -> &str {
        if slot < 1 || slot >= self.morphos.len() {
            ""
        } else {
            &self.morphos[slot]
        }
    }

    /// Look up a lemma by key; the key is normalized first.
    pub fn find_lemma(&self, key: &str) -> Option<LemmaId> {
        self.lemma_index.get(&normalize_key(key)).copied()
    }

    pub fn lemma(&self, id: LemmaId) -> &Lemma {
        &self.lemmas[id.0 as usize]
    }

    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id.0 as usize]
    }

    /// Language code to language name for every loaded translation file.
    pub fn languages(&self) -> &HashMap<String, String> {
        &self.languages
    }

    /// Number of headwords in the lexicon.
    pub fn lemma_count(&self) -> usize {
        self.lemmas.len()
    }
}

fn read_required(path: PathBuf) -> Result<String> {
    fs::read_to_string(&path).map_err(|source| LoadError::File { path, source })
}

/// The description list is language-specific; prefer the French file and
/// fall back to the plain `.la` name.
fn read_morphos(dir: &Path) -> Result<String> {
    let preferred = dir.join("morphos.fr");
    match fs::read_to_string(&preferred) {
        Ok(text) => Ok(text),
        Err(err) => fs::read_to_string(dir.join("morphos.la")).map_err(|_| LoadError::File {
            path: preferred,
            source: err,
        }),
    }
}
