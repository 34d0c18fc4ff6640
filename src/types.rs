use serde::{Deserialize, Serialize};

/// Classification of a failed probe. Transport errors are folded into these
/// buckets at the unit boundary; anything unrecognized becomes `Unknown`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Timeout,
    ConnectionRefused,
    DnsError,
    HttpError,
    Cancelled,
    Unknown,
}

/// Terminal result of one probe unit: the caller's identity echoed back,
/// plus either a payload (success) or a classified failure reason.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome<I, P> {
    pub identity: I,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<P>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureReason>,
}

impl<I, P> ProbeOutcome<I, P> {
    pub fn success(identity: I, payload: P) -> Self {
        Self {
            identity,
            succeeded: true,
            payload: Some(payload),
            failure_reason: None,
        }
    }

    pub fn failure(identity: I, reason: FailureReason) -> Self {
        Self {
            identity,
            succeeded: false,
            payload: None,
            failure_reason: Some(reason),
        }
    }
}

/// Ordering policy for the outcomes of a batch.
///
/// `Submission` restores the input order (index-by-index pairing with the
/// unit list); `Completion` exposes the non-deterministic finish order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeOrder {
    #[default]
    Submission,
    Completion,
}

/// Aggregate result of one batch invocation. Immutable once returned.
///
/// Invariants: `outcomes.len() == total_submitted` and
/// `total_succeeded + total_failed == total_submitted` — every submitted unit
/// yields exactly one outcome, even on timeout or cancellation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BatchResult<I, P> {
    pub total_submitted: usize,
    pub total_succeeded: usize,
    pub total_failed: usize,
    pub outcomes: Vec<ProbeOutcome<I, P>>,
}

impl<I, P> BatchResult<I, P> {
    /// Iterate over successful outcomes as `(identity, payload)` pairs.
    pub fn successes(&self) -> impl Iterator<Item = (&I, &P)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.payload.as_ref().map(|p| (&o.identity, p)))
    }

    /// Identities of failed units, useful for caller-driven re-submission.
    pub fn failed_identities(&self) -> impl Iterator<Item = &I> {
        self.outcomes
            .iter()
            .filter(|o| !o.succeeded)
            .map(|o| &o.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_constructors_keep_fields_disjoint() {
        let ok: ProbeOutcome<u16, String> = ProbeOutcome::success(80, "http".into());
        assert!(ok.succeeded && ok.payload.is_some() && ok.failure_reason.is_none());

        let err: ProbeOutcome<u16, String> =
            ProbeOutcome::failure(81, FailureReason::ConnectionRefused);
        assert!(!err.succeeded && err.payload.is_none());
        assert_eq!(err.failure_reason, Some(FailureReason::ConnectionRefused));
    }

    #[test]
    fn failure_reason_serializes_snake_case() {
        let s = serde_json::to_string(&FailureReason::ConnectionRefused).unwrap();
        assert_eq!(s, "\"connection_refused\"");
    }
}
