// self
use crate::{
	_prelude::*,
	obs::{PhaseKind, PhaseOutcome},
};

/// Future returned by [`PhaseSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedPhase<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`PhaseSpan::instrument`].
#[cfg(not(feature = "tracing"))]
pub type InstrumentedPhase<F> = F;

/// Span covering one manager phase.
#[derive(Clone, Debug)]
pub struct PhaseSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl PhaseSpan {
	/// Opens a span for `kind` at call site `stage`.
	pub fn new(kind: PhaseKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth1_batch.phase",
				phase = kind.as_str(),
				stage,
				outcome = tracing::field::Empty,
				status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs a synchronous section inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Attaches the span to `fut` without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedPhase<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Fills in the `outcome` and `status` fields and emits a completion event.
	pub fn record_outcome(&self, outcome: PhaseOutcome, status: Option<u16>) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());

			if let Some(status) = status {
				self.span.record("status", status);
			}

			self.span.in_scope(|| match outcome {
				PhaseOutcome::Success | PhaseOutcome::Attempt => tracing::debug!("phase completed"),
				_ => tracing::warn!(outcome = outcome.as_str(), ?status, "phase did not succeed"),
			});
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (self, outcome, status);
		}
	}
}
