//! Outcome of one round trip that reached the server.

// self
use crate::_prelude::*;

/// Status reported for a `200 OK` whose body could not be used ("I'm a teapot").
pub const MALFORMED_STATUS: u16 = 418;

/// What the server answered.
///
/// Transport failures and out-of-order calls never produce an [`Exchange`]; they surface as
/// [`Error`]. Anything the server actually answered lands here so callers can branch on the
/// raw status code (`405 Method Not Allowed` means the consumer key lacks an access tier).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exchange<T> {
	/// `200 OK` with a usable body.
	Success(T),
	/// Any status other than `200 OK`.
	Rejected {
		/// Raw HTTP status.
		status: u16,
		/// Raw response body, kept for diagnostics.
		body: String,
	},
	/// `200 OK` whose body did not have the expected shape.
	Malformed {
		/// Raw response body.
		body: String,
	},
}
impl<T> Exchange<T> {
	/// Status code callers should branch on; [`MALFORMED_STATUS`] for malformed bodies.
	pub fn status(&self) -> u16 {
		match self {
			Self::Success(_) => 200,
			Self::Rejected { status, .. } => *status,
			Self::Malformed { .. } => MALFORMED_STATUS,
		}
	}

	/// Whether the exchange succeeded.
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	/// Borrowed success value.
	pub fn value(&self) -> Option<&T> {
		match self {
			Self::Success(value) => Some(value),
			_ => None,
		}
	}

	/// Owned success value; `None` when the server refused or answered garbage.
	pub fn ok(self) -> Option<T> {
		match self {
			Self::Success(value) => Some(value),
			_ => None,
		}
	}

	/// Raw body of a failed exchange.
	pub fn error_body(&self) -> Option<&str> {
		match self {
			Self::Success(_) => None,
			Self::Rejected { body, .. } | Self::Malformed { body } => Some(body),
		}
	}

	/// Maps the success value, keeping failures as they are.
	pub fn map<U, F>(self, f: F) -> Exchange<U>
	where
		F: FnOnce(T) -> U,
	{
		match self {
			Self::Success(value) => Exchange::Success(f(value)),
			Self::Rejected { status, body } => Exchange::Rejected { status, body },
			Self::Malformed { body } => Exchange::Malformed { body },
		}
	}
}
