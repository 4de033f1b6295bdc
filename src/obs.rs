//! Optional observability for handshake phases and batch dispatch.
//!
//! # Feature Flags
//!
//! - `tracing`: every phase runs inside an `oauth1_batch.phase` span carrying `phase`, `stage`
//!   and, once known, `outcome` and `status`.
//! - `metrics`: `oauth1_batch_phase_total` counts attempts and outcomes per `phase`;
//!   `oauth1_batch_http_status_total` counts server answers per `phase` and `status`.
//!
//! Without either feature every helper compiles to nothing.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, session::Exchange};

/// Round trips performed by the manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
	/// Request token issuance and authorization URL signing.
	RequestToken,
	/// Access token exchange.
	AccessToken,
	/// Signed batch dispatch.
	Batch,
}
impl PhaseKind {
	/// Stable label for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PhaseKind::RequestToken => "request_token",
			PhaseKind::AccessToken => "access_token",
			PhaseKind::Batch => "batch",
		}
	}
}
impl Display for PhaseKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded per phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseOutcome {
	/// Entry to a phase.
	Attempt,
	/// `200 OK` with a usable body.
	Success,
	/// Non-200 status.
	Rejected,
	/// `200 OK` with an unusable body.
	Malformed,
	/// Error returned before or instead of a server answer.
	Failure,
}
impl PhaseOutcome {
	/// Classifies a finished phase.
	pub fn of<T>(result: &Result<Exchange<T>>) -> Self {
		match result {
			Ok(Exchange::Success(_)) => Self::Success,
			Ok(Exchange::Rejected { .. }) => Self::Rejected,
			Ok(Exchange::Malformed { .. }) => Self::Malformed,
			Err(_) => Self::Failure,
		}
	}

	/// Stable label for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PhaseOutcome::Attempt => "attempt",
			PhaseOutcome::Success => "success",
			PhaseOutcome::Rejected => "rejected",
			PhaseOutcome::Malformed => "malformed",
			PhaseOutcome::Failure => "failure",
		}
	}
}
impl Display for PhaseOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the end of a phase on `span` and in the metrics recorder.
pub fn finish_phase<T>(kind: PhaseKind, span: &PhaseSpan, result: &Result<Exchange<T>>) {
	let outcome = PhaseOutcome::of(result);
	let status = result.as_ref().ok().map(Exchange::status);

	span.record_outcome(outcome, status);
	record_phase_outcome(kind, outcome);

	if let Some(status) = status {
		record_http_status(kind, status);
	}
}
