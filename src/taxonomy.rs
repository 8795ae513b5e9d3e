//! Token classification taxonomy and verdict interpretation.
//!
//! The analyzer tags every lexeme with a numeric category code. The codes
//! are part of the wire contract and must stay stable; this module is the
//! one place they are named.

use serde::{Deserialize, Serialize};

use crate::protocol::Token;

/// Category of a classified lexical token.
///
/// Codes 0-4 have been present in every protocol revision. Code 5 marks a
/// lexically invalid fragment; older engines never emit it, so its absence
/// from a response is normal and simply counts zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    /// Language keyword.
    ReservedWord,
    Identifier,
    Number,
    StringLiteral,
    /// Operators and punctuation.
    Symbol,
    /// Lexically invalid fragment.
    Invalid,
}

/// All categories in wire-code order. Rendering follows this order.
pub const ALL_CATEGORIES: &[TokenCategory] = &[
    TokenCategory::ReservedWord,
    TokenCategory::Identifier,
    TokenCategory::Number,
    TokenCategory::StringLiteral,
    TokenCategory::Symbol,
    TokenCategory::Invalid,
];

impl TokenCategory {
    /// The numeric code used on the wire.
    pub fn code(&self) -> u8 {
        match self {
            TokenCategory::ReservedWord => 0,
            TokenCategory::Identifier => 1,
            TokenCategory::Number => 2,
            TokenCategory::StringLiteral => 3,
            TokenCategory::Symbol => 4,
            TokenCategory::Invalid => 5,
        }
    }

    /// Resolve a wire code. Returns `None` for codes outside the taxonomy.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TokenCategory::ReservedWord),
            1 => Some(TokenCategory::Identifier),
            2 => Some(TokenCategory::Number),
            3 => Some(TokenCategory::StringLiteral),
            4 => Some(TokenCategory::Symbol),
            5 => Some(TokenCategory::Invalid),
            _ => None,
        }
    }

    /// Short column label used by the presenter.
    pub fn label(&self) -> &'static str {
        match self {
            TokenCategory::ReservedWord => "keyword",
            TokenCategory::Identifier => "identifier",
            TokenCategory::Number => "number",
            TokenCategory::StringLiteral => "string",
            TokenCategory::Symbol => "symbol",
            TokenCategory::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Occurrence count per category across one token stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [usize; ALL_CATEGORIES.len()],
}

impl CategoryCounts {
    /// Count of tokens in the given category.
    pub fn get(&self, category: TokenCategory) -> usize {
        self.counts[category.code() as usize]
    }

    /// Total tokens counted. Equals the length of the classified stream.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Iterate `(category, count)` pairs in wire-code order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenCategory, usize)> + '_ {
        ALL_CATEGORIES.iter().map(|c| (*c, self.get(*c)))
    }
}

/// Derive per-category counts from a token stream.
///
/// Pure and total: an empty stream yields all-zero counts. Order of the
/// input does not affect the counts.
pub fn classify(tokens: &[Token]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for token in tokens {
        counts.counts[token.category.code() as usize] += 1;
    }
    counts
}

/// Whether a verdict string signals failure.
///
/// The convention is a case-insensitive `error` prefix after trimming
/// leading whitespace. This is deliberately a prefix match, not a search:
/// `"errors were not found"` is a failure, `"OK, no error here"` is not.
/// Keep every verdict interpretation behind this predicate so the
/// convention can be swapped for a structured field in one place.
pub fn is_failure(verdict: &str) -> bool {
    let trimmed = verdict.trim_start();
    trimmed
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("error"))
}
