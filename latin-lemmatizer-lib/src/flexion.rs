// Inflection-table generation: cross-join a lemma's radicals with its
// model's endings, with irregular-form overrides.

use std::collections::{HashMap, HashSet};

use crate::analyzer::Analyzer;
use crate::types::{InflectionTable, LemmaId};

impl Analyzer {
    /// The full paradigm of a lemma: every slot its model's endings cover,
    /// mapped to the forms at that slot. Empty cells are omitted.
    pub fn inflection_table(&self, id: LemmaId) -> InflectionTable {
        let mut cells = HashMap::new();
        if let Some(model) = self.lemmas[id.0 as usize].model {
            let mut slots: Vec<usize> = self.models[model.0 as usize].endings.keys().copied().collect();
            slots.sort_unstable();
            for slot in slots {
                let forms = self.inflected_forms(id, slot);
                if !forms.is_empty() {
                    cells.insert(slot, forms);
                }
            }
        }
        InflectionTable { lemma: id, cells }
    }

    /// Forms of a lemma at one slot, deduplicated in first-seen order. An
    /// exclusive irregular replaces the regular inflection entirely; a plain
    /// irregular is listed first.
    pub fn inflected_forms(&self, id: LemmaId, slot: usize) -> Vec<String> {
        let lemma = &self.lemmas[id.0 as usize];
        let Some(model) = lemma.model else {
            return Vec::new();
        };

        let mut forms = Vec::new();
        if let Some(irreg) = self.irreg_at(lemma, slot) {
            if irreg.exclusive {
                return vec![irreg.grq.clone()];
            }
            forms.push(irreg.grq.clone());
        }

        if let Some(endings) = self.models[model.0 as usize].endings.get(&slot) {
            for &eid in endings {
                let ending = &self.endings[eid.0 as usize];
                for &rid in lemma.radicals_at(ending.radical) {
                    forms.push(format!("{}{}", self.radicals[rid.0 as usize].grq, ending.grq));
                }
            }
        }

        let mut seen = HashSet::new();
        forms.into_iter().filter(|f| seen.insert(f.clone())).collect()
    }
}
