// The paradigm compiler: parses modeles.la blocks, resolves $variable
// substitutions and parent inheritance, and registers every ending in the
// analyzer's global ending index.

use std::collections::{BTreeSet, HashMap};

use crate::analyzer::Analyzer;
use crate::normalize::{atone, deramise};
use crate::types::{EndingId, ModelId, PartOfSpeech};

/// A single inflectional ending, uniquely owned by one model. Clones made
/// during inheritance point at the inheriting model, never the parent.
#[derive(Debug, Clone)]
pub struct Ending {
    /// The ending with vowel-quantity marks. Empty for a bare-stem cell
    /// (written `-` in the data).
    pub grq: String,
    /// The ending without diacritics.
    pub gr: String,
    /// 1-based morphological slot this ending fills.
    pub morpho: usize,
    /// Radical number this ending attaches to.
    pub radical: usize,
    pub model: ModelId,
}

/// How a stem is derived from a lemma's canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadicalRule {
    /// Use the canonical form unchanged (`K` in the data).
    Identity,
    /// Remove `count` trailing code points, then append `suffix`
    /// (a `0` suffix in the data means append nothing).
    Strip { count: usize, suffix: String },
}

/// A named inflection paradigm.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub parent: Option<ModelId>,
    /// Morphological slot to the endings filling it.
    pub endings: HashMap<usize, Vec<EndingId>>,
    /// Radical number to the rule deriving that stem.
    pub radical_rules: HashMap<usize, RadicalRule>,
    /// Slots for which this model generates no forms.
    pub absents: Vec<usize>,
    /// Part-of-speech character from a `pos:` directive.
    pub pos: Option<char>,
}

impl Model {
    pub fn is_absent(&self, slot: usize) -> bool {
        self.absents.contains(&slot)
    }
}

/// Parse a slot-range string: comma-separated items, each a single integer or
/// an inclusive interval `a-b`. Unparsable items are skipped.
pub(crate) fn parse_range(s: &str) -> Vec<usize> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        match part.find('-') {
            Some(idx) if idx > 0 => {
                let (Ok(start), Ok(end)) = (part[..idx].parse::<usize>(), part[idx + 1..].parse::<usize>())
                else {
                    continue;
                };
                out.extend(start..=end);
            }
            _ => {
                if let Ok(n) = part.parse::<usize>() {
                    out.push(n);
                }
            }
        }
    }
    out
}

impl Analyzer {
    /// Parse a whole modeles file: `$name=value` lines define substitution
    /// variables, `!` lines are comments, and blocks are cut at `modele:`
    /// directives. Models must appear after the parents they inherit from.
    pub(crate) fn load_models_str(&mut self, text: &str) {
        let mut block: Vec<String> = Vec::new();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('!') {
                continue;
            }
            if let Some(assign) = line.strip_prefix('$') {
                if let Some((name, value)) = assign.split_once('=') {
                    self.variables.insert(format!("${name}"), value.to_string());
                }
                continue;
            }
            if line.split(':').next() == Some("modele") && !block.is_empty() {
                self.compile_model(&block);
                block.clear();
            }
            block.push(line.to_string());
        }
        if !block.is_empty() {
            self.compile_model(&block);
        }
    }

    /// Compile one paradigm block. Malformed directive lines are skipped; a
    /// block that never names itself is discarded.
    fn compile_model(&mut self, lines: &[String]) {
        let mut name = String::new();
        for line in lines {
            let line = self.substitute_vars(line);
            let mut fields = line.split(':');
            if fields.next() == Some("modele") {
                if let Some(n) = fields.next() {
                    name = n.to_string();
                }
                break;
            }
        }
        if name.is_empty() {
            return;
        }

        let id = ModelId(self.models.len() as u32);
        let mut model = Model {
            name,
            parent: None,
            endings: HashMap::new(),
            radical_rules: HashMap::new(),
            absents: Vec::new(),
            pos: None,
        };
        // `suf:` entries buffer until inheritance has run.
        let mut suffixings: Vec<(usize, String)> = Vec::new();

        for line in lines {
            let line = self.substitute_vars(line);
            let fields: Vec<&str> = line.split(':').collect();
            match fields[0] {
                "modele" => {}
                "pere" => {
                    if fields.len() > 1 {
                        // An unknown parent name leaves the model parentless.
                        model.parent = self.model_index.get(fields[1]).copied();
                    }
                }
                "des" | "des+" => {
                    if fields.len() < 4 {
                        continue;
                    }
                    let slots = parse_range(fields[1]);
                    let Ok(radical) = fields[2].parse::<usize>() else {
                        continue;
                    };
                    // One `;`-separated group per slot, the last group
                    // repeating when the list runs short; within a group,
                    // `,`-separated alternatives; `-` is the empty ending.
                    let groups: Vec<&str> = fields[3].split(';').collect();
                    for (i, &slot) in slots.iter().enumerate() {
                        let group = groups.get(i).or(groups.last()).copied().unwrap_or("");
                        for alt in group.split(',') {
                            let grq = if alt == "-" { "" } else { alt };
                            self.push_ending(&mut model, id, slot, radical, grq.to_string());
                        }
                    }
                    if fields[0] == "des+" {
                        if let Some(parent) = model.parent {
                            for &slot in &slots {
                                for (radical, grq) in self.endings_of(parent, slot) {
                                    self.push_ending(&mut model, id, slot, radical, grq);
                                }
                            }
                        }
                    }
                }
                "R" => {
                    if fields.len() < 3 {
                        continue;
                    }
                    let Ok(num) = fields[1].parse::<usize>() else {
                        continue;
                    };
                    let rule = if fields[2] == "K" {
                        RadicalRule::Identity
                    } else {
                        let (count, suffix) = fields[2].split_once(',').unwrap_or((fields[2], ""));
                        let Ok(count) = count.parse::<usize>() else {
                            continue;
                        };
                        let suffix = if suffix == "0" { "" } else { suffix };
                        RadicalRule::Strip {
                            count,
                            suffix: suffix.to_string(),
                        }
                    };
                    model.radical_rules.insert(num, rule);
                }
                "abs" => {
                    if fields.len() > 1 {
                        model.absents = parse_range(fields[1]);
                    }
                }
                "abs+" => {
                    if fields.len() > 1 {
                        model.absents.extend(parse_range(fields[1]));
                    }
                }
                "pos" => {
                    if fields.len() > 1 {
                        model.pos = fields[1].chars().next();
                    }
                }
                "suf" => {
                    if fields.len() < 3 {
                        continue;
                    }
                    for slot in parse_range(fields[1]) {
                        suffixings.push((slot, fields[2].to_string()));
                    }
                }
                "sufd" => {
                    if fields.len() < 2 {
                        continue;
                    }
                    let Some(parent) = model.parent else {
                        continue;
                    };
                    let suffix = fields[1].to_string();
                    for (slot, radical, grq) in self.all_endings_of(parent) {
                        if model.is_absent(slot) {
                            continue;
                        }
                        self.push_ending(&mut model, id, slot, radical, format!("{grq}{suffix}"));
                    }
                }
                _ => {}
            }
        }

        if let Some(parent) = model.parent {
            // Part of speech falls back to the parent's.
            if model.pos.is_none() {
                model.pos = self.models[parent.0 as usize].pos;
            }
            // Clone the parent's endings for every slot the child neither
            // defines nor lists as absent, rebinding them to the child.
            let mut slots: Vec<usize> = self.models[parent.0 as usize].endings.keys().copied().collect();
            slots.sort_unstable();
            for slot in slots {
                if model.endings.contains_key(&slot) || model.is_absent(slot) {
                    continue;
                }
                for (radical, grq) in self.endings_of(parent, slot) {
                    self.push_ending(&mut model, id, slot, radical, grq);
                }
            }
            // Radical rules for every number the endings now reference.
            let referenced: BTreeSet<usize> = model
                .endings
                .values()
                .flatten()
                .map(|&eid| self.endings[eid.0 as usize].radical)
                .collect();
            for num in referenced {
                if !model.radical_rules.contains_key(&num) {
                    if let Some(rule) = self.models[parent.0 as usize].radical_rules.get(&num) {
                        model.radical_rules.insert(num, rule.clone());
                    }
                }
            }
            // Merge the parent's absent set.
            let parent_absents = self.models[parent.0 as usize].absents.clone();
            for slot in parent_absents {
                if !model.absents.contains(&slot) {
                    model.absents.push(slot);
                }
            }
        }

        // Late suffixing: applied over the endings as they stand after
        // inheritance.
        let mut suffixed: Vec<(usize, usize, String)> = Vec::new();
        for (slot, suffix) in &suffixings {
            if let Some(eids) = model.endings.get(slot) {
                for &eid in eids {
                    let e = &self.endings[eid.0 as usize];
                    suffixed.push((e.morpho, e.radical, format!("{}{suffix}", e.grq)));
                }
            }
        }
        for (slot, radical, grq) in suffixed {
            self.push_ending(&mut model, id, slot, radical, grq);
        }

        self.model_index.insert(model.name.clone(), id);
        self.models.push(model);
    }

    /// Replace `$name` references (running to the next `;` or end of line)
    /// with their stored values, repeating until none remain. An unknown name
    /// stops the loop.
    pub(crate) fn substitute_vars(&self, line: &str) -> String {
        let mut line = line.to_string();
        while let Some(start) = line.find('$') {
            let end = line[start..].find(';').map_or(line.len(), |i| start + i);
            let name = line[start..end].to_string();
            match self.variables.get(&name) {
                Some(value) => line = line.replacen(&name, value, 1),
                None => break,
            }
        }
        line
    }

    /// Create an ending, attach it to `model` at `slot`, and register it in
    /// the global ending index under its deramised atone form.
    fn push_ending(&mut self, model: &mut Model, id: ModelId, slot: usize, radical: usize, grq: String) {
        let gr = atone(&grq);
        let key = deramise(&gr);
        let eid = EndingId(self.endings.len() as u32);
        self.endings.push(Ending {
            grq,
            gr,
            morpho: slot,
            radical,
            model: id,
        });
        model.endings.entry(slot).or_default().push(eid);
        self.ending_index.entry(key).or_default().push(eid);
    }

    /// Snapshot of a model's endings at one slot as (radical, grq) pairs.
    fn endings_of(&self, id: ModelId, slot: usize) -> Vec<(usize, String)> {
        self.models[id.0 as usize]
            .endings
            .get(&slot)
            .into_iter()
            .flatten()
            .map(|&eid| {
                let e = &self.endings[eid.0 as usize];
                (e.radical, e.grq.clone())
            })
            .collect()
    }

    /// Snapshot of all of a model's endings as (slot, radical, grq) triples,
    /// in slot order.
    fn all_endings_of(&self, id: ModelId) -> Vec<(usize, usize, String)> {
        let mut slots: Vec<usize> = self.models[id.0 as usize].endings.keys().copied().collect();
        slots.sort_unstable();
        let mut out = Vec::new();
        for slot in slots {
            for (radical, grq) in self.endings_of(id, slot) {
                out.push((slot, radical, grq));
            }
        }
        out
    }

    /// True if the model or any of its ancestors carries the given name.
    pub(crate) fn model_is_a(&self, id: ModelId, name: &str) -> bool {
        let mut current = Some(id);
        while let Some(m) = current {
            let model = &self.models[m.0 as usize];
            if model.name == name {
                return true;
            }
            current = model.parent;
        }
        false
    }

    /// Part of speech of a model: the `pos:` character when one was set (or
    /// inherited), otherwise inferred from the ancestry name.
    pub fn model_pos(&self, id: ModelId) -> PartOfSpeech {
        if let Some(code) = self.models[id.0 as usize].pos {
            return PartOfSpeech::from_code(code);
        }
        if ["uita", "lupus", "miles", "manus", "res"]
            .iter()
            .any(|n| self.model_is_a(id, n))
        {
            return PartOfSpeech::Noun;
        }
        if ["doctus", "fortis"].iter().any(|n| self.model_is_a(id, n)) {
            return PartOfSpeech::Adjective;
        }
        if ["amo", "imitor"].iter().any(|n| self.model_is_a(id, n)) {
            return PartOfSpeech::Verb;
        }
        PartOfSpeech::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(text: &str) -> Analyzer {
        let mut a = Analyzer::empty();
        a.load_models_str(text);
        a
    }

    fn model<'a>(a: &'a Analyzer, name: &str) -> &'a Model {
        let id = a.model_index[name];
        &a.models[id.0 as usize]
    }

    fn grqs_at(a: &Analyzer, name: &str, slot: usize) -> Vec<String> {
        model(a, name)
            .endings
            .get(&slot)
            .into_iter()
            .flatten()
            .map(|&eid| a.endings[eid.0 as usize].grq.clone())
            .collect()
    }

    #[test]
    fn parse_range_items_and_intervals() {
        assert_eq!(parse_range("1-6"), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(parse_range("1,3,5"), vec![1, 3, 5]);
        assert_eq!(parse_range("1-3,5,7-9"), vec![1, 2, 3, 5, 7, 8, 9]);
        assert_eq!(parse_range("10"), vec![10]);
        assert_eq!(parse_range("2,x,4"), vec![2, 4]);
    }

    #[test]
    fn des_groups_alternatives_and_reuse() {
        let a = compile("modele:m\nR:1:K\ndes:1-3:1:a,b;-\n");
        assert_eq!(grqs_at(&a, "m", 1), vec!["a", "b"]);
        // `-` is the empty ending.
        assert_eq!(grqs_at(&a, "m", 2), vec![""]);
        // The last group repeats when the list runs short.
        assert_eq!(grqs_at(&a, "m", 3), vec![""]);
    }

    #[test]
    fn endings_land_in_the_global_index() {
        let a = compile("modele:m\nR:1:K\ndes:1:1:ă\n");
        let hits = &a.ending_index["a"];
        assert_eq!(hits.len(), 1);
        assert_eq!(a.endings[hits[0].0 as usize].grq, "ă");
        assert_eq!(a.endings[hits[0].0 as usize].gr, "a");
    }

    #[test]
    fn variable_substitution() {
        let a = compile("$x=a;b\nmodele:m\nR:1:K\ndes:1-2:1:$x\n");
        assert_eq!(grqs_at(&a, "m", 1), vec!["a"]);
        assert_eq!(grqs_at(&a, "m", 2), vec!["b"]);
    }

    #[test]
    fn unknown_variable_is_left_in_place() {
        let a = compile("modele:m\nR:1:K\ndes:1:1:$nope\n");
        assert_eq!(grqs_at(&a, "m", 1), vec!["$nope"]);
    }

    #[test]
    fn radical_rules_parse() {
        let a = compile("modele:m\nR:1:K\nR:2:2,āv\nR:3:1,0\ndes:1:1:a\n");
        let m = model(&a, "m");
        assert_eq!(m.radical_rules[&1], RadicalRule::Identity);
        assert_eq!(
            m.radical_rules[&2],
            RadicalRule::Strip {
                count: 2,
                suffix: "āv".into()
            }
        );
        assert_eq!(
            m.radical_rules[&3],
            RadicalRule::Strip {
                count: 1,
                suffix: String::new()
            }
        );
    }

    const PARENT: &str = "modele:parent\nR:1:K\ndes:1-4:1:a;b;c;d\n";

    #[test]
    fn inheritance_clones_missing_slots() {
        let text = format!("{PARENT}\nmodele:child\npere:parent\nabs:4\ndes:1:1:x\n");
        let a = compile(&text);
        let child_id = a.model_index["child"];
        assert_eq!(grqs_at(&a, "child", 1), vec!["x"]);
        assert_eq!(grqs_at(&a, "child", 2), vec!["b"]);
        assert_eq!(grqs_at(&a, "child", 3), vec!["c"]);
        // Absent slots are not inherited.
        assert!(model(&a, "child").endings.get(&4).is_none());
        // Clones are rebound to the child.
        for eids in model(&a, "child").endings.values() {
            for &eid in eids {
                assert_eq!(a.endings[eid.0 as usize].model, child_id);
            }
        }
        // The radical rule the endings reference is inherited too.
        assert_eq!(model(&a, "child").radical_rules[&1], RadicalRule::Identity);
    }

    #[test]
    fn absents_merge_with_parent() {
        let text = "modele:parent\nR:1:K\nabs:9\ndes:1:1:a\n\nmodele:child\npere:parent\nabs:4\n";
        let a = compile(text);
        let m = model(&a, "child");
        assert!(m.is_absent(4));
        assert!(m.is_absent(9));
    }

    #[test]
    fn des_plus_clones_parent_endings_at_slot() {
        let text = format!("{PARENT}\nmodele:child\npere:parent\ndes+:1:1:y\n");
        let a = compile(&text);
        assert_eq!(grqs_at(&a, "child", 1), vec!["y", "a"]);
    }

    #[test]
    fn suf_applies_after_inheritance() {
        let text = format!("{PARENT}\nmodele:child\npere:parent\nsuf:1-2:que\n");
        let a = compile(&text);
        assert_eq!(grqs_at(&a, "child", 1), vec!["a", "aque"]);
        assert_eq!(grqs_at(&a, "child", 2), vec!["b", "bque"]);
        assert_eq!(grqs_at(&a, "child", 3), vec!["c"]);
    }

    #[test]
    fn sufd_suffixes_the_parent_paradigm() {
        let text = format!("{PARENT}\nmodele:child\npere:parent\nabs:4\nsufd:ne\n");
        let a = compile(&text);
        // sufd fills the slots before inheritance runs, so the plain parent
        // endings are not cloned on top.
        assert_eq!(grqs_at(&a, "child", 1), vec!["ane"]);
        assert_eq!(grqs_at(&a, "child", 2), vec!["bne"]);
        assert_eq!(grqs_at(&a, "child", 3), vec!["cne"]);
        assert!(model(&a, "child").endings.get(&4).is_none());
    }

    #[test]
    fn nameless_block_is_discarded() {
        let a = compile("R:1:K\ndes:1:1:a\n");
        assert!(a.models.is_empty());
        assert!(a.ending_index.is_empty());
    }

    #[test]
    fn unknown_parent_leaves_model_parentless() {
        let a = compile("modele:m\npere:ghost\nR:1:K\ndes:1:1:a\n");
        assert_eq!(model(&a, "m").parent, None);
    }

    #[test]
    fn pos_directive_and_inheritance() {
        let text = "modele:parent\npos:v\nR:1:K\ndes:1:1:a\n\nmodele:child\npere:parent\n";
        let a = compile(text);
        assert_eq!(a.model_pos(a.model_index["parent"]), PartOfSpeech::Verb);
        assert_eq!(a.model_pos(a.model_index["child"]), PartOfSpeech::Verb);
    }

    #[test]
    fn pos_falls_back_to_ancestry_names() {
        let text = "modele:lupus\nR:1:K\ndes:1:1:us\n\nmodele:templum\npere:lupus\ndes:1:1:um\n\nmodele:amo\nR:1:K\ndes:1:1:o\n\nmodele:other\nR:1:K\ndes:1:1:x\n";
        let a = compile(text);
        assert_eq!(a.model_pos(a.model_index["lupus"]), PartOfSpeech::Noun);
        assert_eq!(a.model_pos(a.model_index["templum"]), PartOfSpeech::Noun);
        assert_eq!(a.model_pos(a.model_index["amo"]), PartOfSpeech::Verb);
        assert_eq!(a.model_pos(a.model_index["other"]), PartOfSpeech::Unknown);
    }
}
