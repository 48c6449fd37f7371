// The lexicon: headword records, their stems, irregular forms, and
// translations.

use std::collections::HashMap;

use crate::analyzer::Analyzer;
use crate::model::{parse_range, RadicalRule};
use crate::normalize::{atone, communes, deramise, normalize_key};
use crate::types::{IrregId, LemmaId, ModelId, PartOfSpeech, RadicalId};

/// A stem used in inflection.
#[derive(Debug, Clone)]
pub struct Radical {
    /// The stem with vowel-quantity marks (bare vowels marked common).
    pub grq: String,
    /// The stem without diacritics.
    pub gr: String,
    /// Radical number (1-based).
    pub num: usize,
    pub lemma: LemmaId,
}

/// An explicit form overriding or supplementing the regular inflection.
#[derive(Debug, Clone)]
pub struct Irreg {
    /// The form with vowel-quantity marks.
    pub grq: String,
    /// The form without diacritics.
    pub gr: String,
    /// An exclusive irregular replaces the regular inflection at its slots
    /// instead of supplementing it.
    pub exclusive: bool,
    pub lemma: LemmaId,
    /// Morphological slots this form covers.
    pub morphos: Vec<usize>,
}

/// A dictionary headword with its inflectional data.
#[derive(Debug, Clone)]
pub struct Lemma {
    /// Normalized lookup key.
    pub key: String,
    /// Canonical form with vowel-quantity marks.
    pub grq: String,
    /// Canonical form without diacritics.
    pub gr: String,
    /// Alternative canonical forms (comma-separated after the first in the
    /// lexicon record).
    pub alt_grqs: Vec<String>,
    /// Resolved inflection model; absent when the record names a model that
    /// never got compiled.
    pub model: Option<ModelId>,
    /// Raw morphological-information string from the lexicon.
    pub ind_morph: String,
    pub pos: PartOfSpeech,
    /// Homonym number (0 for the primary entry).
    pub homonym: usize,
    /// Cross-reference extracted from a trailing `cf. WORD`.
    pub cross_ref: Option<String>,
    /// Radical number to the stems carrying it.
    pub(crate) radicals: HashMap<usize, Vec<RadicalId>>,
    pub(crate) irregs: Vec<IrregId>,
    /// Slots covered by exclusive irregulars; the regular generator skips
    /// these.
    pub(crate) irreg_excl: Vec<usize>,
    /// Corpus occurrence count from the lexicon.
    pub occurrences: u64,
    pub(crate) translations: HashMap<String, String>,
}

impl Lemma {
    /// Translation in `lang`, falling back to French.
    pub fn translation(&self, lang: &str) -> Option<&str> {
        self.translations
            .get(lang)
            .or_else(|| self.translations.get("fr"))
            .map(String::as_str)
    }

    /// All stems of this lemma for one radical number.
    pub fn radicals_at(&self, num: usize) -> &[RadicalId] {
        self.radicals.get(&num).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn is_exclusive_irreg(&self, slot: usize) -> bool {
        self.irreg_excl.contains(&slot)
    }
}

/// Strip a trailing homonym digit from a canonical form, returning the
/// stripped form and the homonym number (0 when absent).
fn strip_homonym_digit(form: &str) -> (String, usize) {
    let mut chars = form.chars();
    if let Some(last) = chars.next_back() {
        if let Some(n) = last.to_digit(10) {
            if n > 0 {
                return (chars.as_str().to_string(), n as usize);
            }
        }
    }
    (form.to_string(), 0)
}

/// Infer the part of speech from the lexicon's free-text morphological
/// information, by ordered substring match.
fn detect_pos(ind_morph: &str) -> PartOfSpeech {
    if ind_morph.contains("adj.") {
        PartOfSpeech::Adjective
    } else if ind_morph.contains("conj") {
        PartOfSpeech::Conjunction
    } else if ind_morph.contains("excl") {
        PartOfSpeech::Exclamation
    } else if ind_morph.contains("interj") {
        PartOfSpeech::Interjection
    } else if ind_morph.contains("num.") {
        PartOfSpeech::Numeral
    } else if ind_morph.contains("pron.") {
        PartOfSpeech::Pronoun
    } else if ind_morph.contains("prép") {
        PartOfSpeech::Preposition
    } else if ind_morph.contains("adv") {
        PartOfSpeech::Adverb
    } else if ind_morph.contains(" nom ") || ind_morph.contains("npr.") {
        PartOfSpeech::Noun
    } else {
        PartOfSpeech::Unknown
    }
}

/// Extract a `cf. WORD` cross-reference at the end of the info string.
fn extract_cross_ref(ind_morph: &str) -> Option<String> {
    let rest = &ind_morph[ind_morph.rfind("cf.")? + 3..];
    let word = rest.trim_start();
    if word.is_empty() || word.len() == rest.len() {
        return None;
    }
    if word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(word.to_string())
    } else {
        None
    }
}

/// Derive a stem from a canonical form: strip a trailing combining breve,
/// then apply the model's rule.
fn stem_from_rule(grq: &str, rule: &RadicalRule) -> String {
    let grq = grq.strip_suffix('\u{0306}').unwrap_or(grq);
    match rule {
        RadicalRule::Identity => grq.to_string(),
        RadicalRule::Strip { count, suffix } => {
            let chars: Vec<char> = grq.chars().collect();
            let keep = chars.len().saturating_sub(*count);
            let mut stem: String = chars[..keep].iter().collect();
            stem.push_str(suffix);
            stem
        }
    }
}

impl Analyzer {
    /// Parse the whole lexicon file, one headword per line.
    pub(crate) fn load_lexicon_str(&mut self, text: &str) {
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('!') {
                continue;
            }
            self.add_lemma_line(line);
        }
    }

    /// Parse one `KEY=GRQ|MODEL|RAD1|RAD2|INDMORPH|NBOCC` record and build
    /// the lemma's radicals. Records with fewer than five fields are skipped.
    fn add_lemma_line(&mut self, line: &str) {
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() < 5 {
            return;
        }

        // `KEY=` is optional; the canonical form doubles as the key.
        let (raw_key, raw_grq) = match parts[0].split_once('=') {
            Some((key, grq)) => (key, grq),
            None => (parts[0], parts[0]),
        };
        let key = normalize_key(raw_key);
        let mut forms = raw_grq.split(',');
        let (grq, homonym) = strip_homonym_digit(forms.next().unwrap_or(""));
        let gr = atone(&grq);
        let alt_grqs: Vec<String> = forms
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let model = self.model_index.get(parts[1]).copied();
        let ind_morph = parts[4].to_string();
        let mut pos = detect_pos(&ind_morph);
        if pos == PartOfSpeech::Unknown {
            if let Some(mid) = model {
                pos = self.model_pos(mid);
            }
        }
        let occurrences = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(0);

        let id = LemmaId(self.lemmas.len() as u32);
        let mut lemma = Lemma {
            key,
            grq,
            gr,
            alt_grqs,
            model,
            cross_ref: extract_cross_ref(&ind_morph),
            ind_morph,
            pos,
            homonym,
            radicals: HashMap::new(),
            irregs: Vec::new(),
            irreg_excl: Vec::new(),
            occurrences,
            translations: HashMap::new(),
        };

        // Explicit stems from fields 3 and 4 carry radical numbers 1 and 2.
        for (field, num) in [(2usize, 1usize), (3, 2)] {
            let Some(text) = parts.get(field) else { continue };
            for stem in text.split(',') {
                if stem.is_empty() {
                    continue;
                }
                self.push_radical(&mut lemma, id, num, communes(stem), atone(stem));
            }
        }

        // Derived stems for every rule number without explicit stems, from
        // the primary form and each alternative.
        if let Some(mid) = lemma.model {
            let mut rules: Vec<(usize, RadicalRule)> = self.models[mid.0 as usize]
                .radical_rules
                .iter()
                .map(|(&n, r)| (n, r.clone()))
                .collect();
            rules.sort_by_key(|&(n, _)| n);
            let forms: Vec<String> = std::iter::once(lemma.grq.clone())
                .chain(lemma.alt_grqs.iter().cloned())
                .collect();
            for (num, rule) in rules {
                if lemma.radicals.contains_key(&num) {
                    continue;
                }
                for form in &forms {
                    let stem = stem_from_rule(form, &rule);
                    self.push_radical(&mut lemma, id, num, communes(&stem), atone(&stem));
                }
            }
        }

        self.lemma_index.insert(lemma.key.clone(), id);
        self.lemmas.push(lemma);
    }

    /// Attach a stem to the lemma and register it in the global radical
    /// index under its deramised atone form.
    fn push_radical(&mut self, lemma: &mut Lemma, id: LemmaId, num: usize, grq: String, gr: String) {
        let key = deramise(&gr);
        let rid = RadicalId(self.radicals.len() as u32);
        self.radicals.push(Radical { grq, gr, num, lemma: id });
        lemma.radicals.entry(num).or_default().push(rid);
        self.radical_index.entry(key).or_default().push(rid);
    }

    /// Parse the irregular-forms file: `FORM[*]:LEMMAKEY:SLOTRANGE` per line,
    /// a trailing `*` marking the form exclusive. Forms naming an unknown
    /// lemma are skipped.
    pub(crate) fn load_irregs_str(&mut self, text: &str) {
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('!') {
                continue;
            }
            let parts: Vec<&str> = line.split(':').collect();
            if parts.len() < 3 {
                continue;
            }
            let (grq, exclusive) = match parts[0].strip_suffix('*') {
                Some(stripped) => (stripped, true),
                None => (parts[0], false),
            };
            let gr = atone(grq);
            let Some(&lemma_id) = self.lemma_index.get(&deramise(parts[1])) else {
                continue;
            };
            let morphos = parse_range(parts[2]);

            let iid = IrregId(self.irregs.len() as u32);
            let key = deramise(&gr);
            self.irregs.push(Irreg {
                grq: grq.to_string(),
                gr,
                exclusive,
                lemma: lemma_id,
                morphos: morphos.clone(),
            });
            self.irreg_index.entry(key).or_default().push(iid);
            let lemma = &mut self.lemmas[lemma_id.0 as usize];
            lemma.irregs.push(iid);
            if exclusive {
                lemma.irreg_excl.extend(morphos);
            }
        }
    }

    /// Attach translations from one `lemmes.XX` file. The first non-comment
    /// line is the language name; the rest are `key:text` records.
    pub(crate) fn load_translations_str(&mut self, lang: &str, text: &str) {
        let mut named = false;
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('!') {
                continue;
            }
            if !named {
                named = true;
                if !line.contains(':') {
                    self.languages.insert(lang.to_string(), line.to_string());
                    continue;
                }
                self.languages.insert(lang.to_string(), lang.to_string());
            }
            let Some((key, translation)) = line.split_once(':') else {
                continue;
            };
            if let Some(&id) = self.lemma_index.get(&deramise(key)) {
                self.lemmas[id.0 as usize]
                    .translations
                    .insert(lang.to_string(), translation.to_string());
            }
        }
    }

    /// First irregular of the lemma covering `slot`, if any.
    pub(crate) fn irreg_at(&self, lemma: &Lemma, slot: usize) -> Option<&Irreg> {
        lemma
            .irregs
            .iter()
            .map(|&iid| &self.irregs[iid.0 as usize])
            .find(|ir| ir.morphos.contains(&slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODELS: &str = "\
modele:uita
R:1:1,0
des:1-2:1:ă;ae

modele:amo
R:1:1,0
R:2:1,āv
des:3:1:ō
";

    fn analyzer_with(lemmas: &str) -> Analyzer {
        let mut a = Analyzer::empty();
        a.load_models_str(MODELS);
        a.load_lexicon_str(lemmas);
        a
    }

    #[test]
    fn lemma_line_with_explicit_key() {
        let a = analyzer_with("pūella=pŭēllă|uita|||f. : jeune fille|1200\n");
        let id = a.lemma_index["puella"];
        let lemma = &a.lemmas[id.0 as usize];
        assert_eq!(lemma.key, "puella");
        assert_eq!(lemma.grq, "pŭēllă");
        assert_eq!(lemma.gr, "puella");
        assert_eq!(lemma.occurrences, 1200);
    }

    #[test]
    fn lemma_line_without_key_uses_canonical_form() {
        let a = analyzer_with("pŭēllă|uita|||f. : jeune fille|\n");
        assert!(a.lemma_index.contains_key("puella"));
    }

    #[test]
    fn homonym_digit_is_stripped() {
        let a = analyzer_with("pōpŭlŭs2|uita|||f. : peuplier|30\n");
        let id = a.lemma_index["populus2"];
        let lemma = &a.lemmas[id.0 as usize];
        assert_eq!(lemma.grq, "pōpŭlŭs");
        assert_eq!(lemma.homonym, 2);
    }

    #[test]
    fn short_records_are_skipped() {
        let a = analyzer_with("puella|uita|rad\n");
        assert!(a.lemmas.is_empty());
    }

    #[test]
    fn derived_radicals_follow_the_model_rules() {
        let a = analyzer_with("ămō|amo|||v. tr. : aimer|900\n");
        let id = a.lemma_index["amo"];
        let lemma = &a.lemmas[id.0 as usize];
        // Rule 1 drops one code point, rule 2 appends the perfect suffix.
        let r1 = &a.radicals[lemma.radicals_at(1)[0].0 as usize];
        assert_eq!(r1.gr, "am");
        let r2 = &a.radicals[lemma.radicals_at(2)[0].0 as usize];
        assert_eq!(r2.grq, "ămāv");
        assert_eq!(r2.gr, "amav");
        // The global index keys are deramised.
        assert!(a.radical_index.contains_key("amau"));
    }

    #[test]
    fn explicit_radicals_preempt_derivation() {
        let a = analyzer_with("ămō|amo||ămāvĕr|v. tr. : aimer|900\n");
        let id = a.lemma_index["amo"];
        let lemma = &a.lemmas[id.0 as usize];
        let stems: Vec<&str> = lemma
            .radicals_at(2)
            .iter()
            .map(|&rid| a.radicals[rid.0 as usize].gr.as_str())
            .collect();
        // The derived "amav" never appears: the explicit stem wins.
        assert_eq!(stems, vec!["amaver"]);
    }

    #[test]
    fn alternative_canonical_forms_yield_radicals() {
        let a = analyzer_with("tēmptō,tēntō|amo|||v. tr. : essayer|400\n");
        assert!(a.radical_index.contains_key("tempt"));
        assert!(a.radical_index.contains_key("tent"));
        assert!(a.radical_index.contains_key("temptau"));
        assert!(a.radical_index.contains_key("tentau"));
    }

    #[test]
    fn pos_detection_from_ind_morph() {
        assert_eq!(detect_pos("adj. : docte"), PartOfSpeech::Adjective);
        assert_eq!(detect_pos("conj. : et"), PartOfSpeech::Conjunction);
        assert_eq!(detect_pos("interj."), PartOfSpeech::Interjection);
        assert_eq!(detect_pos("pron. : qui"), PartOfSpeech::Pronoun);
        assert_eq!(detect_pos("prép. : envers"), PartOfSpeech::Preposition);
        assert_eq!(detect_pos("adv. : souvent"), PartOfSpeech::Adverb);
        assert_eq!(detect_pos("npr. : Rome"), PartOfSpeech::Noun);
        assert_eq!(detect_pos("v. tr. : aimer"), PartOfSpeech::Unknown);
    }

    #[test]
    fn pos_falls_back_to_the_model() {
        let a = analyzer_with("ămō|amo|||v. tr. : aimer|900\n");
        let id = a.lemma_index["amo"];
        assert_eq!(a.lemmas[id.0 as usize].pos, PartOfSpeech::Verb);
    }

    #[test]
    fn cross_reference_extraction() {
        assert_eq!(extract_cross_ref("v. intr. cf. abeo"), Some("abeo".into()));
        assert_eq!(extract_cross_ref("cf. ab2"), Some("ab2".into()));
        assert_eq!(extract_cross_ref("no reference"), None);
        assert_eq!(extract_cross_ref("cf.nothing"), None);
    }

    #[test]
    fn irregs_attach_to_their_lemma() {
        let mut a = analyzer_with("sŭm|amo|||v. : être|9000\n");
        a.load_irregs_str("sŭm*:sum:3\nĕst:sum:4,5\n! comment\nbad:line\n");
        let id = a.lemma_index["sum"];
        let lemma = &a.lemmas[id.0 as usize];
        assert_eq!(lemma.irregs.len(), 2);
        assert!(lemma.is_exclusive_irreg(3));
        assert!(!lemma.is_exclusive_irreg(4));
        assert!(a.irreg_index.contains_key("sum"));
        assert!(a.irreg_index.contains_key("est"));
        let irr = &a.irregs[a.irreg_index["est"][0].0 as usize];
        assert_eq!(irr.morphos, vec![4, 5]);
        assert!(!irr.exclusive);
    }

    #[test]
    fn irregs_for_unknown_lemmas_are_skipped() {
        let mut a = analyzer_with("");
        a.load_irregs_str("sŭm*:sum:3\n");
        assert!(a.irregs.is_empty());
    }

    #[test]
    fn translations_attach_by_deramised_key() {
        let mut a = analyzer_with("pŭēllă|uita|||f. : jeune fille|1200\n");
        a.load_translations_str("en", "! comment\nEnglish\npuella:girl\nmissing:x\n");
        assert_eq!(a.languages["en"], "English");
        let id = a.lemma_index["puella"];
        let lemma = &a.lemmas[id.0 as usize];
        assert_eq!(lemma.translation("en"), Some("girl"));
        // Fallback goes to French, absent here.
        assert_eq!(lemma.translation("de"), None);
    }
}
