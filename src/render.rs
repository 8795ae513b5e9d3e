//! Output formatting for analysis sessions.
//!
//! Two formats, as in the service's other tooling:
//! - Pretty: colored terminal output with the token grid and verdict panels
//! - JSON: structured output for programmatic consumption
//!
//! The presenter only reads session state; it never mutates it.

use colored::*;
use serde::Serialize;

use crate::protocol::Token;
use crate::session::{Phase, Session};
use crate::taxonomy::{self, CategoryCounts, TokenCategory, ALL_CATEGORIES};

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report for one session.
#[derive(Serialize)]
pub struct JsonReport {
    pub version: String,
    pub language: String,
    pub endpoint: String,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<JsonAnalysis>,
}

/// The settled portion of a JSON report.
#[derive(Serialize)]
pub struct JsonAnalysis {
    pub tokens: Vec<JsonToken>,
    pub counts: Vec<JsonCount>,
    pub total_tokens: usize,
    pub syntax: JsonVerdict,
    pub semantic: JsonVerdict,
}

#[derive(Serialize)]
pub struct JsonToken {
    pub lexeme: String,
    pub category: TokenCategory,
    pub code: u8,
}

#[derive(Serialize)]
pub struct JsonCount {
    pub category: TokenCategory,
    pub count: usize,
}

#[derive(Serialize)]
pub struct JsonVerdict {
    pub text: String,
    pub failed: bool,
}

/// Build the JSON report for a session.
pub fn json_report(session: &Session, endpoint: &str) -> JsonReport {
    let analysis = session.result().map(|result| {
        let counts = taxonomy::classify(&result.tokens);
        JsonAnalysis {
            tokens: result
                .tokens
                .iter()
                .map(|t| JsonToken {
                    lexeme: t.lexeme.clone(),
                    category: t.category,
                    code: t.category.code(),
                })
                .collect(),
            counts: counts
                .iter()
                .map(|(category, count)| JsonCount { category, count })
                .collect(),
            total_tokens: counts.total(),
            syntax: JsonVerdict {
                failed: taxonomy::is_failure(&result.syntax_verdict),
                text: result.syntax_verdict.clone(),
            },
            semantic: JsonVerdict {
                failed: taxonomy::is_failure(&result.semantic_verdict),
                text: result.semantic_verdict.clone(),
            },
        }
    });

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        language: session.language().as_str().to_string(),
        endpoint: endpoint.to_string(),
        phase: session.phase().as_str().to_string(),
        transport_error: session.transport_error().map(|e| e.to_string()),
        analysis,
    }
}

/// Write the session as JSON to stdout.
pub fn write_json(session: &Session, endpoint: &str) -> anyhow::Result<()> {
    let report = json_report(session, endpoint);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write the session in pretty (human-readable) format.
pub fn write_pretty(session: &Session, endpoint: &str) {
    println!();
    print!("  ");
    print!("{}", "lexiscan".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Language: ".dimmed());
    println!("{}", session.language());
    print!("  {}", "Endpoint: ".dimmed());
    println!("{}", endpoint);
    println!();

    match session.phase() {
        Phase::Settled => {
            let result = session
                .result()
                .expect("settled session must carry a result");
            write_token_grid(&result.tokens);
            println!();
            write_verdict("Syntax", &result.syntax_verdict);
            write_verdict("Semantic", &result.semantic_verdict);
        }
        Phase::Failed => {
            let cause = session.transport_error().unwrap_or("unknown error");
            println!("  {} {}", "✗".red(), "connection failed".red().bold());
            println!("    {}", cause);
            println!();
            println!(
                "  {}",
                "The analysis service could not be reached. Is it running?".dimmed()
            );
        }
        Phase::Idle | Phase::Requesting => {
            println!("  {}", "(no analysis yet)".dimmed());
        }
    }
    println!();
}

/// One row per token, one column per category, `x` in the matching cell,
/// and a totals row derived from the classified counts.
fn write_token_grid(tokens: &[Token]) {
    if tokens.is_empty() {
        println!("  {}", "(no tokens)".dimmed());
        return;
    }

    let lexeme_width = tokens
        .iter()
        .map(|t| t.lexeme.chars().count())
        .max()
        .unwrap_or(0)
        .max("token".len());

    // Header row
    print!("  {}", pad("token", lexeme_width).bold());
    for category in ALL_CATEGORIES {
        print!("  {}", category.label().bold());
    }
    println!();

    // Token rows
    for token in tokens {
        print!("  {}", pad(&token.lexeme, lexeme_width));
        for category in ALL_CATEGORIES {
            let mark = if token.category == *category { "x" } else { "" };
            print!("  {}", pad(mark, category.label().len()).green());
        }
        println!();
    }

    // Totals row
    let counts: CategoryCounts = taxonomy::classify(tokens);
    print!("  {}", pad("total", lexeme_width).dimmed());
    for category in ALL_CATEGORIES {
        let count = counts.get(*category).to_string();
        print!("  {}", pad(&count, category.label().len()).dimmed());
    }
    println!();
    println!();
    println!("  {} {}", "Tokens:".dimmed(), counts.total());
}

fn write_verdict(label: &str, verdict: &str) {
    if taxonomy::is_failure(verdict) {
        print!("  {} {} ", "✗".red(), pad(label, 8).red().bold());
        println!("{}", verdict.red());
    } else {
        print!("  {} {} ", "✓".green(), pad(label, 8).bold());
        println!("{}", verdict);
    }
}

/// Left-pad to a fixed width before coloring, so escape codes do not skew
/// the column math.
fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::language::SourceLanguage;
    use crate::protocol::AnalysisResult;

    fn settled_session() -> Session {
        let mut session = Session::new(SourceLanguage::C);
        let pending = session.begin_analysis().unwrap();
        session.complete(
            pending.generation,
            Ok(AnalysisResult {
                tokens: vec![
                    Token {
                        lexeme: "int".to_string(),
                        category: TokenCategory::ReservedWord,
                    },
                    Token {
                        lexeme: "a".to_string(),
                        category: TokenCategory::Identifier,
                    },
                ],
                syntax_verdict: "OK".to_string(),
                semantic_verdict: "Error: undeclared variable 'x'".to_string(),
            }),
        );
        session
    }

    #[test]
    fn test_json_report_settled() {
        let session = settled_session();
        let report = json_report(&session, "http://localhost:8080/analyze");

        assert_eq!(report.phase, "settled");
        assert_eq!(report.language, "c");
        assert!(report.transport_error.is_none());

        let analysis = report.analysis.unwrap();
        assert_eq!(analysis.tokens.len(), 2);
        assert_eq!(analysis.total_tokens, 2);
        assert!(!analysis.syntax.failed);
        assert!(analysis.semantic.failed);

        let keyword_count = analysis
            .counts
            .iter()
            .find(|c| c.category == TokenCategory::ReservedWord)
            .unwrap();
        assert_eq!(keyword_count.count, 1);
    }

    #[test]
    fn test_json_report_failed() {
        let mut session = Session::new(SourceLanguage::Swift);
        let pending = session.begin_analysis().unwrap();
        session.complete(pending.generation, Err(ClientError::Timeout));

        let report = json_report(&session, "http://localhost:8080/analyze");
        assert_eq!(report.phase, "failed");
        assert!(report.analysis.is_none());
        assert!(report.transport_error.unwrap().contains("timed out"));
    }

    #[test]
    fn test_json_report_serializes_categories_by_name() {
        let session = settled_session();
        let report = json_report(&session, "http://localhost:8080/analyze");
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["analysis"]["tokens"][0]["category"], "reserved_word");
        assert_eq!(value["analysis"]["tokens"][0]["code"], 0);
    }
}
