//! Ordered batch of calls shipped in one signed round trip.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, call::ApiCall};

/// Batch-level contract violations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RequestError {
	/// A call with the same name is already queued.
	#[error("A call named `{name}` is already queued.")]
	DuplicateCallName {
		/// Offending call name.
		name: String,
		/// The rejected call, handed back untouched.
		call: Box<ApiCall>,
	},
	/// Nothing to send.
	#[error("The request contains no calls.")]
	Empty,
	/// A queued call left compulsory parameters unset.
	#[error("The call `{call}` is missing compulsory parameters: {}.", missing.join(", "))]
	MissingCompulsory {
		/// Call name.
		call: String,
		/// Unset compulsory parameter names.
		missing: Vec<String>,
	},
}
impl RequestError {
	/// Recovers the call a failed [`ApiRequest::enqueue`] refused.
	pub fn into_call(self) -> Option<ApiCall> {
		match self {
			Self::DuplicateCallName { call, .. } => Some(*call),
			_ => None,
		}
	}
}

/// Ordered, duplicate-free collection of [`ApiCall`]s.
///
/// The response envelope keys each result by call name, so two calls with the same name cannot
/// share a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiRequest {
	calls: Vec<ApiCall>,
}
impl ApiRequest {
	/// Creates an empty batch.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a batch holding exactly `call`.
	pub fn with_call(call: ApiCall) -> Self {
		Self { calls: vec![call] }
	}

	/// Appends `call`.
	///
	/// When its name is already queued the batch is left untouched and the call comes back
	/// inside the error; see [`RequestError::into_call`].
	pub fn enqueue(&mut self, call: ApiCall) -> Result<(), RequestError> {
		if self.contains(call.name()) {
			return Err(RequestError::DuplicateCallName {
				name: call.name().to_owned(),
				call: Box::new(call),
			});
		}

		self.calls.push(call);

		Ok(())
	}

	/// Removes every queued call.
	pub fn clear(&mut self) {
		self.calls.clear();
	}

	/// Number of queued calls.
	pub fn len(&self) -> usize {
		self.calls.len()
	}

	/// Whether no call is queued.
	pub fn is_empty(&self) -> bool {
		self.calls.is_empty()
	}

	/// Whether a call named `name` is queued.
	pub fn contains(&self, name: &str) -> bool {
		self.calls.iter().any(|call| call.name() == name)
	}

	/// Queued call named `name`.
	pub fn get(&self, name: &str) -> Option<&ApiCall> {
		self.calls.iter().find(|call| call.name() == name)
	}

	/// Queued calls, in enqueue order.
	pub fn iter(&self) -> std::slice::Iter<'_, ApiCall> {
		self.calls.iter()
	}

	/// Checks the batch is sendable and every compulsory parameter holds a value.
	///
	/// Sending never calls this; it is offered for callers who prefer to fail before the
	/// server does.
	pub fn validate(&self) -> Result<(), RequestError> {
		if self.is_empty() {
			return Err(RequestError::Empty);
		}

		for call in &self.calls {
			let missing = call.missing_compulsory();

			if !missing.is_empty() {
				return Err(RequestError::MissingCompulsory {
					call: call.name().to_owned(),
					missing: missing.into_iter().map(ToOwned::to_owned).collect(),
				});
			}
		}

		Ok(())
	}

	/// The batch as a JSON array.
	pub fn to_json(&self) -> Value {
		Value::Array(self.calls.iter().map(ApiCall::to_json).collect())
	}

	/// Renders `[<fragment>,...]` in enqueue order. Serializing never mutates the batch.
	pub fn to_wire_fragment(&self) -> String {
		self.to_json().to_string()
	}
}
impl<'a> IntoIterator for &'a ApiRequest {
	type IntoIter = std::slice::Iter<'a, ApiCall>;
	type Item = &'a ApiCall;

	fn into_iter(self) -> Self::IntoIter {
		self.calls.iter()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn call(name: &str) -> ApiCall {
		ApiCall::new(name).expect("Fixture call name should be accepted.")
	}

	#[test]
	fn serializes_calls_in_enqueue_order() {
		let mut request = ApiRequest::new();
		let mut clans = call("characters.getClans");

		clans.set_items_filter(["name"]);
		request.enqueue(clans).expect("First call should be queued.");
		request.enqueue(call("general.getTips")).expect("Second call should be queued.");

		assert_eq!(
			request.to_wire_fragment(),
			concat!(
				r#"[{"call":"characters.getClans","params":{},"itemsFilter":["name"],"contextFilter":[]},"#,
				r#"{"call":"general.getTips","params":{},"itemsFilter":[],"contextFilter":[]}]"#,
			),
		);
	}

	#[test]
	fn serialization_is_idempotent() {
		let mut request = ApiRequest::new();

		request.enqueue(call("a.one")).expect("Call should be queued.");
		request.enqueue(call("a.two")).expect("Call should be queued.");
		request.enqueue(call("a.three")).expect("Call should be queued.");

		let first = request.to_wire_fragment();
		let second = request.to_wire_fragment();

		assert_eq!(first, second);
		assert_eq!(request.len(), 3);
		assert_eq!(request.to_json().as_array().map(Vec::len), Some(3));
		assert_eq!(
			request.iter().map(ApiCall::name).collect::<Vec<_>>(),
			["a.one", "a.two", "a.three"],
		);
	}

	#[test]
	fn duplicate_name_is_rejected_without_mutation() {
		let mut request = ApiRequest::with_call(call("players.getFeed"));
		let before = request.clone();
		let err = request
			.enqueue(call("players.getFeed"))
			.expect_err("Duplicate call names should be rejected.");

		assert!(matches!(
			&err,
			RequestError::DuplicateCallName { name, .. } if name == "players.getFeed"
		));
		assert_eq!(request, before);
		assert_eq!(request.len(), 1);
	}

	#[test]
	fn rejected_call_is_handed_back_with_its_values() {
		let mut request = ApiRequest::with_call(call("players.getFeed"));
		let feed = ApiCall::builder("players.getFeed")
			.parameter("nbStoriesMax")
			.value("nbStoriesMax", 5)
			.items_filter(["id"])
			.build()
			.expect("Fixture call should build.");
		let err = request.enqueue(feed.clone()).expect_err("Duplicate call names should be rejected.");

		assert_eq!(err.to_string(), "A call named `players.getFeed` is already queued.");
		assert_eq!(err.into_call(), Some(feed));
		assert_eq!(RequestError::Empty.into_call(), None);
	}

	#[test]
	fn clear_empties_the_batch() {
		let mut request = ApiRequest::with_call(call("general.getTips"));

		request.clear();

		assert!(request.is_empty());
		assert_eq!(request.to_wire_fragment(), "[]");
		request.enqueue(call("general.getTips")).expect("Cleared batch should accept the call again.");
	}

	#[test]
	fn validate_reports_empty_and_missing_compulsory() {
		assert_eq!(ApiRequest::new().validate(), Err(RequestError::Empty));

		let levels = ApiCall::builder("characters.getCharacterLevels")
			.compulsory_parameter("characterID")
			.parameter("levelMax")
			.build()
			.expect("Fixture call should build.");
		let mut request = ApiRequest::with_call(levels);
		let err = request.validate().expect_err("Unset compulsory parameter should be reported.");

		assert_eq!(
			err.to_string(),
			"The call `characters.getCharacterLevels` is missing compulsory parameters: characterID.",
		);

		request.clear();
		request
			.enqueue(
				ApiCall::builder("characters.getCharacterLevels")
					.compulsory_parameter("characterID")
					.value("characterID", 1)
					.build()
					.expect("Fixture call should build."),
			)
			.expect("Call should be queued.");

		assert_eq!(request.validate(), Ok(()));
	}
}
