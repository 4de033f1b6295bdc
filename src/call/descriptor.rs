//! Declarative call descriptions: the data a call kind is built from.

// self
use crate::{
	_prelude::*,
	call::{ApiCall, CallError},
};

/// Access tiers a consumer key must hold for a call to be accepted.
///
/// Informational only: the client never enforces these, the server answers
/// `405 Method Not Allowed` instead. Callers use them for pre-flight checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRequirements {
	/// Requires public access.
	pub public: bool,
	/// Requires user access.
	pub user: bool,
	/// Requires action access.
	pub action: bool,
}
impl AccessRequirements {
	/// Public-tier call.
	pub const PUBLIC: Self = Self { public: true, user: false, action: false };
	/// User-tier call.
	pub const USER: Self = Self { public: false, user: true, action: false };
	/// Action-tier call.
	pub const ACTION: Self = Self { public: false, user: false, action: true };
}

/// Sections the server fills in for a call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultShape {
	/// Response carries an `items` section.
	pub items: bool,
	/// Response carries a `context` section.
	pub context: bool,
}
impl ResultShape {
	/// Only `context`.
	pub const CONTEXT: Self = Self { items: false, context: true };
	/// Both `items` and `context`.
	pub const ITEMS_AND_CONTEXT: Self = Self { items: true, context: true };
}

/// One declared parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamSpec {
	/// Parameter name as sent on the wire.
	pub name: &'static str,
	/// Whether the parameter can never be unset.
	pub compulsory: bool,
}
impl ParamSpec {
	/// Optional parameter.
	pub const fn optional(name: &'static str) -> Self {
		Self { name, compulsory: false }
	}

	/// Compulsory parameter.
	pub const fn compulsory(name: &'static str) -> Self {
		Self { name, compulsory: true }
	}
}

/// Static description of a call kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallDescriptor {
	/// Remote operation identifier, e.g. `players.getFeed`.
	pub name: &'static str,
	/// Declared parameters, in wire order.
	pub parameters: &'static [ParamSpec],
	/// Access tier flags.
	pub access: AccessRequirements,
	/// Result sections.
	pub returns: ResultShape,
}
impl CallDescriptor {
	/// Builds a fresh [`ApiCall`] with every parameter declared and unset.
	///
	/// Compulsory parameters start unset too; set them before sending.
	pub fn instantiate(&self) -> Result<ApiCall, CallError> {
		let mut builder = ApiCall::builder(self.name).access(self.access).returns(self.returns);

		for spec in self.parameters {
			builder = if spec.compulsory {
				builder.compulsory_parameter(spec.name)
			} else {
				builder.parameter(spec.name)
			};
		}

		builder.build()
	}

	/// Declared parameter names that are compulsory.
	pub fn compulsory_parameters(&self) -> impl Iterator<Item = &'static str> {
		self.parameters.iter().filter(|spec| spec.compulsory).map(|spec| spec.name)
	}
}
