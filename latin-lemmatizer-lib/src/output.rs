// Output formatting: resolve id-keyed analysis maps into deterministic,
// serializable views (lemmas by key, analyses by slot).

use serde::Serialize;

use crate::analyzer::Analyzer;
use crate::types::{Analyses, Analysis, InflectionTable};

/// Analyses of one token attributed to one lemma.
#[derive(Debug, Clone, Serialize)]
pub struct LemmaAnalyses {
    /// Canonical form with quantity marks.
    pub lemma: String,
    /// Normalized lookup key.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub analyses: Vec<Analysis>,
}

/// A token with its resolved analyses.
#[derive(Debug, Clone, Serialize)]
pub struct TokenReport {
    pub token: String,
    pub lemmas: Vec<LemmaAnalyses>,
}

/// One paradigm cell, resolved.
#[derive(Debug, Clone, Serialize)]
pub struct TableCell {
    pub slot: usize,
    pub morpho: String,
    pub forms: Vec<String>,
}

/// An inflection table resolved to plain strings, cells in slot order.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub lemma: String,
    pub cells: Vec<TableCell>,
}

/// Resolve an analysis map for one token. Lemmas are ordered by key,
/// analyses by slot and form, so output is stable across runs.
pub fn report(analyzer: &Analyzer, token: &str, analyses: &Analyses, lang: &str) -> TokenReport {
    let mut lemmas: Vec<LemmaAnalyses> = analyses
        .iter()
        .map(|(&id, list)| {
            let lemma = analyzer.lemma(id);
            let mut analyses = list.clone();
            analyses.sort_by(|a, b| {
                a.morpho_index
                    .cmp(&b.morpho_index)
                    .then_with(|| a.form.cmp(&b.form))
            });
            LemmaAnalyses {
                lemma: lemma.grq.clone(),
                key: lemma.key.clone(),
                translation: lemma.translation(lang).map(str::to_string),
                analyses,
            }
        })
        .collect();
    lemmas.sort_by(|a, b| a.key.cmp(&b.key));
    TokenReport {
        token: token.to_string(),
        lemmas,
    }
}

/// Render a token report as indented plain-text lines.
pub fn to_lines(report: &TokenReport) -> String {
    let mut out = String::new();
    out.push_str(&report.token);
    out.push('\n');
    if report.lemmas.is_empty() {
        out.push_str("  unknown\n");
        return out;
    }
    for entry in &report.lemmas {
        match &entry.translation {
            Some(translation) => out.push_str(&format!("  {} : {}\n", entry.lemma, translation)),
            None => out.push_str(&format!("  {}\n", entry.lemma)),
        }
        for analysis in &entry.analyses {
            out.push_str(&format!("    {}  {}\n", analysis.form, analysis.morpho));
        }
    }
    out
}

/// Resolve an inflection table, cells in slot order with their descriptions.
pub fn table_report(analyzer: &Analyzer, table: &InflectionTable) -> TableReport {
    let mut slots: Vec<usize> = table.cells.keys().copied().collect();
    slots.sort_unstable();
    TableReport {
        lemma: analyzer.lemma(table.lemma).grq.clone(),
        cells: slots
            .into_iter()
            .map(|slot| TableCell {
                slot,
                morpho: analyzer.morpho(slot).to_string(),
                forms: table.cells[&slot].clone(),
            })
            .collect(),
    }
}

/// Render a table report as plain-text lines.
pub fn table_to_lines(report: &TableReport) -> String {
    let mut out = String::new();
    out.push_str(&report.lemma);
    out.push('\n');
    for cell in &report.cells {
        out.push_str(&format!(
            "{:>4}  {}: {}\n",
            cell.slot,
            cell.morpho,
            cell.forms.join(", ")
        ));
    }
    out
}
