//! Command-line interface for lexiscan.

use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::client::AnalysisClient;
use crate::config::Config;
use crate::language::{SourceLanguage, ALL_LANGUAGES};
use crate::render;
use crate::session::{Phase, Session};
use crate::taxonomy;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Cap on concurrent requests when analyzing several files.
const MAX_CONCURRENT_REQUESTS: usize = 8;

/// Client for a remote multi-language source analysis service.
///
/// Sends a source snippet to the analyzer, which returns a classified
/// lexical token stream plus syntax and semantic verdicts, and renders
/// the outcome.
#[derive(Parser)]
#[command(name = "lexiscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze source files, an inline snippet, or a language's sample
    #[command(visible_alias = "run")]
    Analyze(AnalyzeArgs),
    /// List the selectable languages
    Languages(LanguagesArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Source files to analyze (language chosen by extension)
    pub paths: Vec<PathBuf>,

    /// Inline snippet to analyze instead of files
    #[arg(short = 'c', long)]
    pub code: Option<String>,

    /// Language identifier: c, swift, or java
    #[arg(short, long)]
    pub language: Option<String>,

    /// Base URL of the analysis service
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Output format: pretty or json
    #[arg(short, long)]
    pub format: Option<String>,
}

/// Arguments for the languages command.
#[derive(Parser)]
pub struct LanguagesArgs {
    /// Also print each language's seed sample
    #[arg(short, long)]
    pub samples: bool,
}

/// One unit of work: a session's language plus optional explicit text.
/// `text == None` analyzes the language's registered sample.
#[derive(Debug)]
struct Input {
    label: String,
    language: SourceLanguage,
    text: Option<String>,
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let config = Config::load()?;

    // Validate format
    let format = args
        .format
        .as_deref()
        .unwrap_or_else(|| config.format())
        .to_string();
    if format != "pretty" && format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            format
        );
        return Ok(EXIT_ERROR);
    }

    // Resolve the selected language before any session exists; anything
    // outside the closed set is rejected here
    let selected = match resolve_language(args, &config) {
        Ok(lang) => lang,
        Err(code) => return Ok(code),
    };

    // Build the work list
    let inputs = match collect_inputs(args, selected) {
        Ok(inputs) => inputs,
        Err(code) => return Ok(code),
    };

    let endpoint = args
        .endpoint
        .as_deref()
        .unwrap_or_else(|| config.endpoint())
        .to_string();
    let timeout_ms = args.timeout_ms.unwrap_or_else(|| config.timeout_ms());
    let client = AnalysisClient::new(&endpoint, Duration::from_millis(timeout_ms));

    // Spinner for the in-flight wait; json output stays clean
    let spinner = if format == "pretty" {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("spinner template is static"),
        );
        pb.set_message("analyzing...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    // Drive one independent session per input, concurrently for files
    let runtime = tokio::runtime::Runtime::new()?;
    let mut outcomes: Vec<(usize, String, Session)> = runtime.block_on(async {
        stream::iter(inputs.into_iter().enumerate())
            .map(|(index, input)| {
                let client = &client;
                async move {
                    let mut session = Session::new(input.language);
                    if let Some(text) = input.text {
                        session.set_code(text);
                    }
                    session.run_analysis(client).await;
                    (index, input.label, session)
                }
            })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await
    });
    outcomes.sort_by_key(|(index, _, _)| *index);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    // Render
    if format == "json" {
        let reports: Vec<_> = outcomes
            .iter()
            .map(|(_, _, session)| render::json_report(session, client.endpoint()))
            .collect();
        if reports.len() == 1 {
            println!("{}", serde_json::to_string_pretty(&reports[0])?);
        } else {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    } else {
        let show_labels = outcomes.len() > 1;
        for (_, label, session) in &outcomes {
            if show_labels {
                println!();
                println!("  === {} ===", label);
            }
            render::write_pretty(session, client.endpoint());
        }
    }

    Ok(exit_code(&outcomes))
}

/// Resolve the language selection from flags and config.
fn resolve_language(args: &AnalyzeArgs, config: &Config) -> Result<Option<SourceLanguage>, i32> {
    let id = args.language.as_deref().or(config.language.as_deref());
    match id {
        None => Ok(None),
        Some(id) => match SourceLanguage::from_id(id) {
            Some(lang) => Ok(Some(lang)),
            None => {
                eprintln!(
                    "Error: unknown language {:?}, must be one of: {}",
                    id,
                    language_ids().join(", ")
                );
                Err(EXIT_ERROR)
            }
        },
    }
}

/// Assemble the inputs to analyze.
fn collect_inputs(
    args: &AnalyzeArgs,
    selected: Option<SourceLanguage>,
) -> Result<Vec<Input>, i32> {
    if args.code.is_some() && !args.paths.is_empty() {
        eprintln!("Error: pass either file paths or --code, not both");
        return Err(EXIT_ERROR);
    }

    // Inline snippet
    if let Some(code) = &args.code {
        // The original selector starts on C; an explicit flag overrides
        let language = selected.unwrap_or(SourceLanguage::C);
        return Ok(vec![Input {
            label: "<inline>".to_string(),
            language,
            text: Some(code.clone()),
        }]);
    }

    // No input at all: analyze the selected language's registered sample
    if args.paths.is_empty() {
        let language = selected.unwrap_or(SourceLanguage::C);
        return Ok(vec![Input {
            label: format!("<{} sample>", language),
            language,
            text: None,
        }]);
    }

    // Files: explicit language applies to all, otherwise go by extension
    let mut inputs = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let language = match selected {
            Some(lang) => lang,
            None => {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                match SourceLanguage::from_extension(ext) {
                    Some(lang) => lang,
                    None => {
                        eprintln!(
                            "Error: cannot determine language for {:?}; use --language",
                            path
                        );
                        return Err(EXIT_ERROR);
                    }
                }
            }
        };

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error: cannot read {:?}: {}", path, e);
                return Err(EXIT_ERROR);
            }
        };

        inputs.push(Input {
            label: path.to_string_lossy().to_string(),
            language,
            text: Some(text),
        });
    }

    Ok(inputs)
}

/// Map the finished sessions to an exit code.
///
/// Transport/protocol failures dominate; failing verdicts on a settled
/// session are an analysis outcome, not a client error, and map to the
/// softer failure code.
fn exit_code(outcomes: &[(usize, String, Session)]) -> i32 {
    let mut failed = false;
    for (_, _, session) in outcomes {
        match session.phase() {
            Phase::Failed => return EXIT_ERROR,
            Phase::Settled => {
                let result = session.result().expect("settled session carries a result");
                if taxonomy::is_failure(&result.syntax_verdict)
                    || taxonomy::is_failure(&result.semantic_verdict)
                {
                    failed = true;
                }
            }
            Phase::Idle | Phase::Requesting => {}
        }
    }
    if failed {
        EXIT_FAILED
    } else {
        EXIT_SUCCESS
    }
}

/// Run the languages command.
pub fn run_languages(args: &LanguagesArgs) -> anyhow::Result<i32> {
    println!("Available languages:");
    println!();

    for language in ALL_LANGUAGES {
        let extensions: Vec<String> = language
            .extensions()
            .iter()
            .map(|e| format!(".{}", e))
            .collect();
        println!("  {:<8} ({})", language.as_str(), extensions.join(", "));

        if args.samples {
            println!();
            for line in language.sample().lines() {
                println!("      {}", line);
            }
            println!();
        }
    }

    if !args.samples {
        println!();
        println!("Usage:");
        println!("  lexiscan analyze --language <id>");
        println!("  lexiscan languages --samples");
    }

    Ok(EXIT_SUCCESS)
}

/// The closed set of selectable language identifiers.
fn language_ids() -> Vec<&'static str> {
    ALL_LANGUAGES.iter().map(|l| l.as_str()).collect()
}
