//! Handles to in-flight submissions.

use tokio::task::JoinHandle;

use formwire_core::FieldErrors;
use formwire_http::{FailureDetail, TransportError, TransportResponse};

/// How a submission settled.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The server accepted the submission.
    Success(TransportResponse),
    /// The server rejected the input with field errors.
    Invalid(FieldErrors),
    /// Any other failure.
    Failed(FailureDetail),
    /// The request was aborted.
    Cancelled,
}

impl Outcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The response of a successful submission.
    pub const fn response(&self) -> Option<&TransportResponse> {
        match self {
            Self::Success(response) => Some(response),
            _ => None,
        }
    }
}

impl From<Result<TransportResponse, TransportError>> for Outcome {
    fn from(result: Result<TransportResponse, TransportError>) -> Self {
        match result {
            Ok(response) => Self::Success(response),
            Err(TransportError::Cancelled) => Self::Cancelled,
            Err(TransportError::Validation { errors }) => Self::Invalid(errors),
            Err(TransportError::Other(detail)) => Self::Failed(detail),
        }
    }
}

/// A submission running on the tokio runtime.
///
/// Dropping the handle detaches it; the request keeps running and its
/// callbacks still fire. Use [`FormController::cancel`](crate::FormController::cancel)
/// to stop it.
#[derive(Debug)]
pub struct Submission {
    id: u64,
    handle: JoinHandle<Outcome>,
}

impl Submission {
    pub(crate) const fn new(id: u64, handle: JoinHandle<Outcome>) -> Self {
        Self { id, handle }
    }

    /// Identifier unique within the owning controller.
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns `true` once the submission has settled and `on_finish` has run.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the submission to settle.
    ///
    /// A submission whose task panicked inside a callback reports
    /// [`Outcome::Failed`].
    pub async fn settled(self) -> Outcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => Outcome::Failed(FailureDetail::network(format!(
                "submission task failed: {err}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_outcome_from_result() {
        let ok: Outcome = Ok(TransportResponse::new(StatusCode::OK, "done")).into();
        assert!(ok.is_success());
        assert_eq!(ok.response().map(TransportResponse::text).as_deref(), Some("done"));

        let cancelled: Outcome = Err(TransportError::Cancelled).into();
        assert!(cancelled.is_cancelled());
        assert!(cancelled.response().is_none());

        let failed: Outcome = Err(TransportError::Other(FailureDetail::network("offline"))).into();
        assert!(matches!(failed, Outcome::Failed(ref d) if d.message == "offline"));
    }

    #[tokio::test]
    async fn test_settled_reports_panics_as_failures() {
        let handle = tokio::spawn(async {
            let exploded = true;
            assert!(!exploded, "callback exploded");
            Outcome::Cancelled
        });
        let outcome = Submission::new(1, handle).settled().await;
        assert!(matches!(outcome, Outcome::Failed(ref d) if d.message.contains("submission task failed")));
    }
}
