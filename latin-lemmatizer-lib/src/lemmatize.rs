// Core lemmatization: the stem/ending split loop, the spelling-consistency
// filter, and the fallback cascade (enclitics, assimilation, contraction,
// capitalization).

use crate::analyzer::Analyzer;
use crate::normalize::deramise;
use crate::types::{Analyses, Analysis};

/// Enclitics stripped, in this order, when a form cannot be lemmatized
/// directly.
const ENCLITICS: [&str; 5] = ["ne", "que", "ue", "ve", "st"];

impl Analyzer {
    /// Return every analysis of a single word form, applying the full
    /// fallback cascade. `sentence_start` marks a token that may be
    /// capitalized only because it opens a sentence.
    pub fn lemmatize(&self, form: &str, sentence_start: bool) -> Analyses {
        self.lemmatize_stage(form, sentence_start, 0)
    }

    /// One stage of the cascade. Stage 0 is the outermost entry; every
    /// recursive call raises the stage, so the cascade is bounded.
    fn lemmatize_stage(&self, form: &str, sentence_start: bool, stage: u32) -> Analyses {
        if form.is_empty() {
            return Analyses::new();
        }

        if stage > 3 {
            let mut found = self.lemmatize_raw(form);
            // A capitalized sentence-initial token may be an ordinary word.
            if sentence_start && form.chars().next().is_some_and(char::is_uppercase) {
                merge(&mut found, self.lemmatize_stage(&form.to_lowercase(), false, 4));
            }
            return found;
        }

        let mut found = self.lemmatize_stage(form, sentence_start, stage + 1);
        match stage {
            3 => {
                // Contracted perfects (amasti for amavisti), merged with the
                // base results.
                let expanded = self.expand_contraction(form);
                if expanded != form {
                    merge(&mut found, self.lemmatize_stage(&expanded, sentence_start, 4));
                }
            }
            2 => {
                // Prefix assimilation, then the reverse substitution.
                let assimilated = self.assimilate(form);
                if assimilated != form {
                    merge(&mut found, self.lemmatize_stage(&assimilated, sentence_start, 3));
                    return found;
                }
                let unassimilated = self.unassimilate(form);
                if unassimilated != form {
                    merge(&mut found, self.lemmatize_stage(&unassimilated, sentence_start, 3));
                }
            }
            1 => {
                // Enclitics, only when nothing matched so far.
                if found.is_empty() {
                    for enclitic in ENCLITICS {
                        if !found.is_empty() {
                            break;
                        }
                        if let Some(host) = form.strip_suffix(enclitic) {
                            // `st` is a clipped `est`: the host keeps its s.
                            let host = if enclitic == "st" {
                                format!("{host}s")
                            } else {
                                host.to_string()
                            };
                            found = self.lemmatize_stage(&host, sentence_start, 1);
                        }
                    }
                }
            }
            0 => {
                // Last resort: a lowercased proper noun.
                if found.is_empty() && form.chars().next().is_some_and(char::is_lowercase) {
                    return self.lemmatize_stage(&capitalize_first(form), false, 1);
                }
            }
            _ => {}
        }
        found
    }

    /// The raw matcher: the irregular probe plus every (stem, ending) split
    /// of the deramised form.
    fn lemmatize_raw(&self, form: &str) -> Analyses {
        // Spelling counters are taken on the original form, before the
        // Ramist letters are folded away.
        let lower = form.to_lowercase();
        let count_v = lower.chars().filter(|&c| c == 'v').count();
        let mut count_ae = lower.matches('æ').count();
        if lower.ends_with('æ') {
            count_ae -= 1;
        }
        let count_oe = lower.matches('œ').count();

        let form = deramise(form);
        let mut found = Analyses::new();

        if let Some(hits) = self.irreg_index.get(&form) {
            for &iid in hits {
                let irreg = &self.irregs[iid.0 as usize];
                for &slot in &irreg.morphos {
                    found.entry(irreg.lemma).or_default().push(Analysis {
                        form: irreg.grq.clone(),
                        morpho: self.morpho(slot).to_string(),
                        morpho_index: slot,
                    });
                }
            }
        }

        let chars: Vec<char> = form.chars().collect();
        for i in 0..=chars.len() {
            let stem: String = chars[..i].iter().collect();
            let ending: String = chars[i..].iter().collect();

            let Some(stem_radicals) = self.radical_index.get(&stem) else {
                continue;
            };

            // Classical ī can stand for written ii. When the split sits on
            // that ambiguity, re-lemmatize with the i doubled, then drop the
            // inserted mark from each returned form. The recursion is bounded
            // by the radical-index check above.
            let stem_ends_i = stem.ends_with('i');
            let stem_ends_ii = stem.ends_with("ii");
            let ending_starts_i = ending.starts_with('i');
            let ending_starts_ii = ending.starts_with("ii");
            let double_i = (ending.is_empty() && stem_ends_i)
                || (ending_starts_i && !ending_starts_ii && !stem_ends_i)
                || (stem_ends_i && !stem_ends_ii && !ending_starts_i);
            if double_i {
                let doubled = format!("{stem}i{ending}");
                for (lemma, mut analyses) in self.lemmatize_raw(&doubled) {
                    if i > 0 {
                        for a in &mut analyses {
                            a.form = remove_char_at(&a.form, i - 1);
                        }
                    }
                    found.entry(lemma).or_default().extend(analyses);
                }
            }

            let Some(ending_ids) = self.ending_index.get(&ending) else {
                continue;
            };

            for &rid in stem_radicals {
                let radical = &self.radicals[rid.0 as usize];
                let lemma = &self.lemmas[radical.lemma.0 as usize];
                let Some(model) = lemma.model else {
                    continue;
                };
                for &eid in ending_ids {
                    let e = &self.endings[eid.0 as usize];
                    if e.model != model || e.radical != radical.num {
                        continue;
                    }
                    if lemma.is_exclusive_irreg(e.morpho) {
                        continue;
                    }
                    if e.morpho < 1 || e.morpho >= self.morphos.len() {
                        continue;
                    }
                    if !spelling_consistent(count_v, count_ae, count_oe, &radical.grq, &e.grq) {
                        continue;
                    }
                    found.entry(radical.lemma).or_default().push(Analysis {
                        form: format!("{}{}", radical.grq, e.grq),
                        morpho: self.morpho(e.morpho).to_string(),
                        morpho_index: e.morpho,
                    });
                }
            }
        }
        found
    }

    /// Replace an unassimilated prefix with its assimilated shape. First
    /// matching table entry wins.
    fn assimilate(&self, form: &str) -> String {
        for (plain, assimilated) in &self.assims {
            if let Some(rest) = form.strip_prefix(plain.as_str()) {
                return format!("{assimilated}{rest}");
            }
        }
        form.to_string()
    }

    /// The reverse substitution: restore the unassimilated prefix.
    fn unassimilate(&self, form: &str) -> String {
        for (plain, assimilated) in &self.assims {
            if let Some(rest) = form.strip_prefix(assimilated.as_str()) {
                return format!("{plain}{rest}");
            }
        }
        form.to_string()
    }

    /// Expand a contracted perfect back to its full shape.
    fn expand_contraction(&self, form: &str) -> String {
        for (contracted, full) in &self.contractions {
            if let Some(head) = form.strip_suffix(contracted.as_str()) {
                return format!("{head}{full}");
            }
        }
        form.to_string()
    }
}

/// A written `v` (and likewise `æ`/`œ`) in the input must line up with the
/// marked stem and ending; a u-spelled input skips the check.
fn spelling_consistent(
    count_v: usize,
    count_ae: usize,
    count_oe: usize,
    stem_grq: &str,
    ending_grq: &str,
) -> bool {
    let stem = stem_grq.to_lowercase();
    let ending = ending_grq.to_lowercase();
    let v_ok = count_v == 0
        || count_v
            == stem.chars().filter(|&c| c == 'v').count()
                + ending.chars().filter(|&c| c == 'v').count();
    let oe_ok = count_oe == 0 || count_oe == stem.matches("ōe").count();
    let ae_ok =
        count_ae == 0 || count_ae == stem.matches("āe").count() + stem.matches("prăe").count();
    v_ok && oe_ok && ae_ok
}

fn merge(into: &mut Analyses, from: Analyses) {
    for (lemma, analyses) in from {
        into.entry(lemma).or_default().extend(analyses);
    }
}

/// Remove the code point at `index`, leaving the string unchanged when the
/// index is out of range.
fn remove_char_at(s: &str, index: usize) -> String {
    s.chars()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, c)| c)
        .collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
