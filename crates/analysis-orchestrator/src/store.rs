use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use analysis_core::{AnalysisError, AnalyzedReport, ErrorKind};
use serde::{Deserialize, Serialize};

/// What to do when a call starts while another is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// The newer call wins; the older one's result is discarded
    #[default]
    Supersede,
    /// The newer call fails fast with `AnalysisError::Busy`
    RejectWhileLoading,
}

impl FromStr for ConcurrencyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supersede" => Ok(ConcurrencyPolicy::Supersede),
            "reject" | "reject_while_loading" => Ok(ConcurrencyPolicy::RejectWhileLoading),
            other => Err(format!("unknown concurrency policy: {}", other)),
        }
    }
}

/// Token identifying one call; only the latest may write
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Failure as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AnalysisError> for SessionError {
    fn from(err: &AnalysisError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub last_error: Option<SessionError>,
    pub current: Option<AnalyzedReport>,
}

#[derive(Default)]
struct Slot {
    generation: u64,
    snapshot: SessionSnapshot,
}

/// Single-slot, in-memory holder for the latest analysis
pub struct AnalysisSessionStore {
    policy: ConcurrencyPolicy,
    slot: Mutex<Slot>,
}

impl Default for AnalysisSessionStore {
    fn default() -> Self {
        Self::new(ConcurrencyPolicy::default())
    }
}

impl AnalysisSessionStore {
    pub fn new(policy: ConcurrencyPolicy) -> Self {
        Self {
            policy,
            slot: Mutex::new(Slot::default()),
        }
    }

    pub fn policy(&self) -> ConcurrencyPolicy {
        self.policy
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a call. The previous result stays visible until this one lands.
    pub fn begin(&self) -> Result<Generation, AnalysisError> {
        let mut slot = self.slot();
        if slot.snapshot.loading && self.policy == ConcurrencyPolicy::RejectWhileLoading {
            tracing::debug!("Rejecting analysis while generation {} is loading", slot.generation);
            return Err(AnalysisError::Busy);
        }

        slot.generation += 1;
        slot.snapshot.loading = true;
        slot.snapshot.last_error = None;
        Ok(Generation(slot.generation))
    }

    /// Commit a result. Returns false, leaving state untouched, when the
    /// generation is stale.
    pub fn set(&self, generation: Generation, report: AnalyzedReport) -> bool {
        let mut slot = self.slot();
        if !Self::is_current(&slot, generation) {
            return false;
        }

        slot.snapshot = SessionSnapshot {
            loading: false,
            last_error: None,
            current: Some(report),
        };
        true
    }

    /// Record a failure, with the same staleness rule as `set`
    pub fn fail(&self, generation: Generation, err: &AnalysisError) -> bool {
        let mut slot = self.slot();
        if !Self::is_current(&slot, generation) {
            return false;
        }

        slot.snapshot.loading = false;
        slot.snapshot.last_error = Some(SessionError::from(err));
        true
    }

    /// Drop the result and invalidate every call still in flight
    pub fn clear(&self) {
        let mut slot = self.slot();
        slot.generation += 1;
        slot.snapshot = SessionSnapshot::default();
    }

    pub fn get(&self) -> SessionSnapshot {
        self.slot().snapshot.clone()
    }

    fn is_current(slot: &Slot, generation: Generation) -> bool {
        if generation.0 != slot.generation {
            tracing::debug!(
                "Discarding stale completion (generation {}, current {})",
                generation.0,
                slot.generation
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{AnalysisRequest, Plan, RequestEcho};

    fn report(text: &str) -> AnalyzedReport {
        let request = AnalysisRequest::global("NIFTY +1%", Plan::Pro);
        AnalyzedReport {
            parsed: response_parser::extract(text),
            echo: RequestEcho::from_request(&request),
        }
    }

    fn current_text(store: &AnalysisSessionStore) -> Option<String> {
        store.get().current.map(|r| r.parsed.display_text)
    }

    #[test]
    fn test_set_and_get() {
        let store = AnalysisSessionStore::default();
        assert!(!store.get().loading);

        let generation = store.begin().unwrap();
        assert!(store.get().loading);
        assert!(store.set(generation, report("first")));

        let snapshot = store.get();
        assert!(!snapshot.loading);
        assert_eq!(current_text(&store).as_deref(), Some("first"));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let store = AnalysisSessionStore::default();
        let a = store.begin().unwrap();
        let b = store.begin().unwrap();

        assert!(store.set(b, report("B")));
        assert!(!store.set(a, report("A")));
        assert!(!store.fail(a, &AnalysisError::Network("late".into())));

        let snapshot = store.get();
        assert_eq!(current_text(&store).as_deref(), Some("B"));
        assert!(snapshot.last_error.is_none());
    }

    #[test]
    fn test_clear_invalidates_in_flight_call() {
        let store = AnalysisSessionStore::default();
        let generation = store.begin().unwrap();
        store.clear();

        assert!(!store.set(generation, report("late")));
        let snapshot = store.get();
        assert!(snapshot.current.is_none());
        assert!(!snapshot.loading);
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let store = AnalysisSessionStore::default();
        let first = store.begin().unwrap();
        store.set(first, report("kept"));

        let second = store.begin().unwrap();
        assert!(store.fail(second, &AnalysisError::QuotaExceeded("429".into())));

        let snapshot = store.get();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.last_error.unwrap().kind, ErrorKind::QuotaExceeded);
        assert_eq!(current_text(&store).as_deref(), Some("kept"));
    }

    #[test]
    fn test_reject_while_loading() {
        let store = AnalysisSessionStore::new(ConcurrencyPolicy::RejectWhileLoading);
        let generation = store.begin().unwrap();
        assert_eq!(store.begin(), Err(AnalysisError::Busy));

        store.set(generation, report("done"));
        assert!(store.begin().is_ok());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("supersede".parse(), Ok(ConcurrencyPolicy::Supersede));
        assert_eq!(" Reject ".parse(), Ok(ConcurrencyPolicy::RejectWhileLoading));
        assert!("queue".parse::<ConcurrencyPolicy>().is_err());
    }
}
