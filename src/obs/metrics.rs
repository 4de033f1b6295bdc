// self
use crate::obs::{PhaseKind, PhaseOutcome};

/// Counts a phase outcome (when `metrics` is enabled).
pub fn record_phase_outcome(kind: PhaseKind, outcome: PhaseOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"oauth1_batch_phase_total",
		"phase" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Counts a status code answered by the server (when `metrics` is enabled).
pub fn record_http_status(kind: PhaseKind, status: u16) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"oauth1_batch_http_status_total",
		"phase" => kind.as_str(),
		"status" => status.to_string()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, status);
}
