//! Session state machine for one editing/analysis interaction.
//!
//! A [`Session`] is the single owner of the selected language, the edited
//! code, and the outcome of the last request. All mutation goes through its
//! transition methods, so the state invariants hold at every boundary:
//!
//! - exactly one of result/transport error is set iff the phase is Settled
//!   or Failed; both are unset in Idle and Requesting;
//! - at most one request is in flight at a time;
//! - a response is applied only if its generation still matches, so a
//!   late response for superseded language/code never overwrites state.

use crate::client::{AnalysisClient, ClientError};
use crate::language::SourceLanguage;
use crate::protocol::{AnalysisRequest, AnalysisResult};

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Requesting,
    Settled,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Requesting => "requesting",
            Phase::Settled => "settled",
            Phase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request captured by [`Session::begin_analysis`], tagged with the
/// generation it belongs to. The tag must be handed back to
/// [`Session::complete`] with the outcome.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub request: AnalysisRequest,
    pub generation: u64,
}

/// One editor instance's language/code/result lifecycle.
///
/// Sessions are independent of each other and reusable indefinitely; there
/// is no terminal state.
#[derive(Debug)]
pub struct Session {
    language: SourceLanguage,
    code: String,
    phase: Phase,
    result: Option<AnalysisResult>,
    transport_error: Option<String>,
    /// Bumped whenever language or code changes; responses carrying an
    /// older generation are stale.
    generation: u64,
    /// Generation of the request currently in flight, if any.
    in_flight: Option<u64>,
}

impl Session {
    /// Create a session seeded with the language's registered sample.
    pub fn new(language: SourceLanguage) -> Self {
        Self {
            language,
            code: language.sample().to_string(),
            phase: Phase::Idle,
            result: None,
            transport_error: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn transport_error(&self) -> Option<&str> {
        self.transport_error.as_deref()
    }

    /// Select a language.
    ///
    /// Always returns to Idle, clears any prior result or error, and
    /// replaces the code with the language's sample. Permitted in any
    /// phase; an in-flight request keeps flying but its response will be
    /// stale on arrival.
    pub fn set_language(&mut self, language: SourceLanguage) {
        self.language = language;
        self.code = language.sample().to_string();
        self.phase = Phase::Idle;
        self.result = None;
        self.transport_error = None;
        self.generation += 1;
    }

    /// Replace the edited code.
    ///
    /// Permitted in any phase. Does not touch the phase or a displayed
    /// result; an in-flight request captured the previous text at
    /// submission time and its response becomes stale.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
        self.generation += 1;
    }

    /// Start an analysis, capturing the current code and language.
    ///
    /// Returns `None` while a request is already in flight: the trigger is
    /// ignored, not queued, so at most one request is in flight per
    /// session. Otherwise the session enters Requesting with both result
    /// slots cleared.
    pub fn begin_analysis(&mut self) -> Option<PendingAnalysis> {
        if self.phase == Phase::Requesting {
            return None;
        }

        self.phase = Phase::Requesting;
        self.result = None;
        self.transport_error = None;
        self.in_flight = Some(self.generation);

        Some(PendingAnalysis {
            request: AnalysisRequest::new(self.code.clone(), self.language),
            generation: self.generation,
        })
    }

    /// Deliver the outcome of a request started with [`begin_analysis`].
    ///
    /// Applies a Settled or Failed transition only when `generation` still
    /// matches the session's current generation; a stale response is
    /// discarded without mutating language, code, or the displayed result.
    /// Discarding the session's own in-flight request returns the phase
    /// from Requesting to Idle, keeping the session usable. Returns whether
    /// the outcome was applied.
    ///
    /// [`begin_analysis`]: Session::begin_analysis
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: Result<AnalysisResult, ClientError>,
    ) -> bool {
        if self.in_flight != Some(generation) {
            // A request superseded before this one resolved; nothing to do.
            return false;
        }
        self.in_flight = None;

        if generation != self.generation {
            // The language or code moved on while this request was flying.
            if self.phase == Phase::Requesting {
                self.phase = Phase::Idle;
            }
            if std::env::var("LEXISCAN_DEBUG").is_ok() {
                eprintln!(
                    "[debug] dropped stale response (generation {} != {})",
                    generation, self.generation
                );
            }
            return false;
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.transport_error = None;
                self.phase = Phase::Settled;
            }
            Err(error) => {
                self.result = None;
                self.transport_error = Some(error.to_string());
                self.phase = Phase::Failed;
            }
        }
        true
    }

    /// Run one full analysis round-trip against `client`.
    ///
    /// Returns `false` if a request was already in flight. Holding the
    /// session exclusively across the await means the response can never
    /// be stale here; the generation check still runs for uniformity.
    pub async fn run_analysis(&mut self, client: &AnalysisClient) -> bool {
        let Some(pending) = self.begin_analysis() else {
            return false;
        };
        let outcome = client.analyze(&pending.request).await;
        self.complete(pending.generation, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Token;
    use crate::taxonomy::TokenCategory;

    fn ok_result() -> AnalysisResult {
        AnalysisResult {
            tokens: vec![Token {
                lexeme: "int".to_string(),
                category: TokenCategory::ReservedWord,
            }],
            syntax_verdict: "OK".to_string(),
            semantic_verdict: "OK".to_string(),
        }
    }

    fn assert_invariants(session: &Session) {
        match session.phase() {
            Phase::Idle | Phase::Requesting => {
                assert!(session.result().is_none());
                assert!(session.transport_error().is_none());
            }
            Phase::Settled => {
                assert!(session.result().is_some());
                assert!(session.transport_error().is_none());
            }
            Phase::Failed => {
                assert!(session.result().is_none());
                assert!(session.transport_error().is_some());
            }
        }
    }

    #[test]
    fn test_new_session_is_seeded() {
        let session = Session::new(SourceLanguage::C);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.code(), SourceLanguage::C.sample());
        assert_invariants(&session);
    }

    #[test]
    fn test_settle_round_trip() {
        let mut session = Session::new(SourceLanguage::C);
        let pending = session.begin_analysis().unwrap();
        assert_eq!(session.phase(), Phase::Requesting);
        assert_invariants(&session);

        assert!(session.complete(pending.generation, Ok(ok_result())));
        assert_eq!(session.phase(), Phase::Settled);
        assert_eq!(session.result().unwrap().tokens.len(), 1);
        assert_invariants(&session);
    }

    #[test]
    fn test_failure_round_trip() {
        let mut session = Session::new(SourceLanguage::C);
        let pending = session.begin_analysis().unwrap();

        let applied = session.complete(
            pending.generation,
            Err(ClientError::Protocol("bad body".to_string())),
        );
        assert!(applied);
        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.transport_error().unwrap().contains("bad body"));
        assert_invariants(&session);
    }

    #[test]
    fn test_trigger_is_noop_while_requesting() {
        let mut session = Session::new(SourceLanguage::C);
        let pending = session.begin_analysis().unwrap();

        // Second trigger is ignored, not queued
        assert!(session.begin_analysis().is_none());
        assert_eq!(session.phase(), Phase::Requesting);

        // The original request still completes normally
        assert!(session.complete(pending.generation, Ok(ok_result())));
        assert_eq!(session.phase(), Phase::Settled);
    }

    #[test]
    fn test_reanalyze_after_settled_and_failed() {
        let mut session = Session::new(SourceLanguage::C);
        let pending = session.begin_analysis().unwrap();
        session.complete(pending.generation, Ok(ok_result()));

        let pending = session.begin_analysis().unwrap();
        assert_eq!(session.phase(), Phase::Requesting);
        assert_invariants(&session);
        session.complete(pending.generation, Err(ClientError::Timeout));
        assert_eq!(session.phase(), Phase::Failed);

        assert!(session.begin_analysis().is_some());
    }

    #[test]
    fn test_language_change_resets_from_any_phase() {
        // From Settled
        let mut session = Session::new(SourceLanguage::C);
        let pending = session.begin_analysis().unwrap();
        session.complete(pending.generation, Ok(ok_result()));
        session.set_code("let x = 1");

        session.set_language(SourceLanguage::Swift);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.code(), SourceLanguage::Swift.sample());
        assert!(session.result().is_none());
        assert_invariants(&session);

        // From Failed
        let pending = session.begin_analysis().unwrap();
        session.complete(pending.generation, Err(ClientError::Timeout));
        session.set_language(SourceLanguage::Java);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.code(), SourceLanguage::Java.sample());
        assert!(session.transport_error().is_none());
        assert_invariants(&session);
    }

    #[test]
    fn test_language_change_while_requesting_discards_response() {
        let mut session = Session::new(SourceLanguage::C);
        let pending = session.begin_analysis().unwrap();

        session.set_language(SourceLanguage::Swift);
        assert_eq!(session.phase(), Phase::Idle);

        // The old response arrives late and must not touch the session
        assert!(!session.complete(pending.generation, Ok(ok_result())));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.language(), SourceLanguage::Swift);
        assert_eq!(session.code(), SourceLanguage::Swift.sample());
        assert!(session.result().is_none());
        assert_invariants(&session);
    }

    #[test]
    fn test_code_edit_while_requesting_discards_response() {
        let mut session = Session::new(SourceLanguage::C);
        let pending = session.begin_analysis().unwrap();

        session.set_code("int changed = 1;");
        assert_eq!(session.phase(), Phase::Requesting);

        // Stale response is dropped and the session returns to Idle so the
        // next trigger is not blocked forever
        assert!(!session.complete(pending.generation, Ok(ok_result())));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.result().is_none());
        assert_eq!(session.code(), "int changed = 1;");
        assert_invariants(&session);

        assert!(session.begin_analysis().is_some());
    }

    #[test]
    fn test_stale_response_does_not_disturb_newer_request() {
        let mut session = Session::new(SourceLanguage::C);
        let first = session.begin_analysis().unwrap();

        // Supersede the first request and start a second one
        session.set_language(SourceLanguage::Swift);
        let second = session.begin_analysis().unwrap();
        assert_eq!(session.phase(), Phase::Requesting);

        // First response arrives late: ignored, second stays in flight
        assert!(!session.complete(first.generation, Ok(ok_result())));
        assert_eq!(session.phase(), Phase::Requesting);

        // Second response applies normally
        assert!(session.complete(second.generation, Ok(ok_result())));
        assert_eq!(session.phase(), Phase::Settled);
        assert_invariants(&session);
    }

    #[test]
    fn test_request_captures_code_at_submission() {
        let mut session = Session::new(SourceLanguage::C);
        session.set_code("int a = 0;");
        let pending = session.begin_analysis().unwrap();

        session.set_code("int b = 1;");
        assert_eq!(pending.request.code, "int a = 0;");
        assert_eq!(pending.request.language, "c");
    }
}
