//! Wire protocol for the `/analyze` endpoint.
//!
//! Field names mirror the service's JSON exactly and must not drift. Raw
//! response bodies are deserialized into [`RawResponse`] and then checked
//! into the domain [`AnalysisResult`]; a body that does not convert cleanly
//! is a protocol failure, never a partial result.

use serde::{Deserialize, Serialize};

use crate::language::SourceLanguage;
use crate::taxonomy::TokenCategory;

/// One analysis request, created fresh per submission.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub code: String,
    pub language: String,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>, language: SourceLanguage) -> Self {
        Self {
            code: code.into(),
            language: language.as_str().to_string(),
        }
    }
}

/// A classified lexical token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub lexeme: String,
    pub category: TokenCategory,
}

/// The settled outcome of one completed request. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Ordered token stream; empty when the engine returned none.
    pub tokens: Vec<Token>,
    pub syntax_verdict: String,
    pub semantic_verdict: String,
}

/// Raw token as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawToken {
    pub lexeme: String,
    #[serde(rename = "type")]
    pub type_code: u8,
}

/// Raw response body as it appears on the wire.
///
/// `lexicalTokens` may be absent or empty; both mean zero tokens. The
/// `error` field is set by the service instead of verdicts when it could
/// not analyze at all.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResponse {
    #[serde(rename = "lexicalTokens", default)]
    pub lexical_tokens: Option<Vec<RawToken>>,
    #[serde(rename = "syntaxResult", default)]
    pub syntax_result: String,
    #[serde(rename = "semanticResult", default)]
    pub semantic_result: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl RawResponse {
    /// Convert the raw body into a domain result.
    ///
    /// Fails on a token type code outside the taxonomy. A stream that never
    /// uses code 5 is the older five-category shape and converts fine.
    pub fn into_result(self) -> Result<AnalysisResult, String> {
        let raw_tokens = self.lexical_tokens.unwrap_or_default();
        let mut tokens = Vec::with_capacity(raw_tokens.len());

        for raw in raw_tokens {
            let category = TokenCategory::from_code(raw.type_code).ok_or_else(|| {
                format!(
                    "unknown token type code {} for lexeme {:?}",
                    raw.type_code, raw.lexeme
                )
            })?;
            tokens.push(Token {
                lexeme: raw.lexeme,
                category,
            });
        }

        Ok(AnalysisResult {
            tokens,
            syntax_verdict: self.syntax_result,
            semantic_verdict: self.semantic_result,
        })
    }
}
