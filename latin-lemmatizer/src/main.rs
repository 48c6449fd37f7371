use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use latin_lemmatizer_lib::{output, Analyzer};

#[derive(Parser)]
#[command(name = "latin-lemmatizer", about = "Latin morphological analyzer and lemmatizer")]
struct Cli {
    /// Latin word or text to analyze. If omitted, reads from stdin.
    input: Option<String>,

    /// Path to the data directory.
    #[arg(short, long, default_value = "data")]
    data: PathBuf,

    /// Print the inflection table of the given lemma instead of lemmatizing.
    #[arg(long, value_name = "LEMMA")]
    table: Option<String>,

    /// Output JSON instead of plain text.
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    /// Translation language code.
    #[arg(long, default_value = "fr")]
    lang: String,
}

fn main() {
    let cli = Cli::parse();
    let analyzer = match Analyzer::new(&cli.data) {
        Ok(analyzer) => analyzer,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    if let Some(key) = &cli.table {
        print_table(&analyzer, key, &cli);
        return;
    }

    match cli.input {
        Some(ref text) => process_line(text, &analyzer, &cli),
        None => {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line.expect("failed to read stdin");
                if !line.trim().is_empty() {
                    process_line(&line, &analyzer, &cli);
                }
            }
        }
    }
}

fn print_table(analyzer: &Analyzer, key: &str, cli: &Cli) {
    let Some(id) = analyzer.find_lemma(key) else {
        eprintln!("unknown lemma: {key}");
        process::exit(1);
    };
    let table = analyzer.inflection_table(id);
    let report = output::table_report(analyzer, &table);
    if cli.json {
        print_json(&report, cli.pretty);
    } else {
        print!("{}", output::table_to_lines(&report));
    }
}

fn process_line(line: &str, analyzer: &Analyzer, cli: &Cli) {
    // A single word skips tokenization and sentence-start handling.
    let reports: Vec<output::TokenReport> = if line.split_whitespace().count() > 1 {
        analyzer
            .lemmatize_text(line)
            .iter()
            .map(|token| output::report(analyzer, &token.token, &token.analyses, &cli.lang))
            .collect()
    } else {
        let word = strip_punct(line.trim());
        let analyses = analyzer.lemmatize(word, false);
        vec![output::report(analyzer, word, &analyses, &cli.lang)]
    };

    if cli.json {
        print_json(&reports, cli.pretty);
    } else {
        for report in &reports {
            print!("{}", output::to_lines(report));
        }
    }
}

/// Strip surrounding punctuation from a single word query.
fn strip_punct(word: &str) -> &str {
    word.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    println!("{}", json.expect("JSON serialization failed"));
}
