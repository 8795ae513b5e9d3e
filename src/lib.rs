//! Lexiscan - client for a remote multi-language source analysis service.
//!
//! The analyzer itself runs elsewhere: lexiscan submits a source snippet
//! and its declared language to `POST /analyze` and receives a classified
//! lexical token stream plus syntax and semantic verdicts. What this crate
//! owns is the session protocol around that exchange:
//!
//! - `language`: the closed set of selectable languages and their seed samples
//! - `taxonomy`: the stable token category codes, count derivation, and the
//!   verdict failure convention
//! - `protocol`: the wire types, field-for-field
//! - `client`: one HTTP request per user action, no retries, no caching
//! - `session`: the state machine owning language, code, phase, and result,
//!   with generation tags to drop stale responses
//! - `render`: pretty and JSON presentation of a session
//! - `config`: optional YAML configuration
//!
//! # Adding a New Language
//!
//! Extend `SourceLanguage` in `src/language.rs`; the compiler walks you
//! through every match that needs a case.

pub mod cli;
pub mod client;
pub mod config;
pub mod language;
pub mod protocol;
pub mod render;
pub mod session;
pub mod taxonomy;

pub use client::{AnalysisClient, ClientError};
pub use config::Config;
pub use language::{SourceLanguage, ALL_LANGUAGES};
pub use protocol::{AnalysisRequest, AnalysisResult, Token};
pub use session::{Phase, PendingAnalysis, Session};
pub use taxonomy::{classify, is_failure, CategoryCounts, TokenCategory};
