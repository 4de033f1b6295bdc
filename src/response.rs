//! Decoding of batch response bodies.
//!
//! The server answers a batch with one JSON object keyed by call name, each entry holding the
//! `items` and/or `context` sections the call returns:
//!
//! ```json
//! {"characters.getClans":{"items":[{"name":"Bangers"}],"context":{}}}
//! ```
//!
//! [`decode`] is the raw capability (text to [`Value`] tree); [`BatchResponse`] indexes the
//! envelope and deserializes individual sections into caller types.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Sections a call result may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
	/// Result rows, shaped by the items filter.
	Items,
	/// Call context (player, errors), shaped by the context filter.
	Context,
}
impl Section {
	/// JSON key of the section.
	pub const fn as_str(self) -> &'static str {
		match self {
			Section::Items => "items",
			Section::Context => "context",
		}
	}
}
impl Display for Section {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not JSON at all.
	#[error("Response body is not valid JSON.")]
	Json {
		/// Parser failure.
		#[source]
		source: serde_json::Error,
	},
	/// Body is JSON but not an object keyed by call name.
	#[error("Response body is not a JSON object keyed by call name.")]
	NotAnObject,
	/// No result for the call.
	#[error("Response has no result for `{call}`.")]
	MissingCall {
		/// Call name.
		call: String,
	},
	/// The call result lacks the section.
	#[error("Result for `{call}` has no `{section}` section.")]
	MissingSection {
		/// Call name.
		call: String,
		/// Section that was requested.
		section: Section,
	},
	/// The section does not fit the requested type.
	#[error("The `{section}` section of `{call}` does not match the requested type.")]
	Shape {
		/// Call name.
		call: String,
		/// Section that was requested.
		section: Section,
		/// Structured failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Parses `text` into a JSON tree.
pub fn decode(text: &str) -> Result<Value, DecodeError> {
	serde_json::from_str(text).map_err(|source| DecodeError::Json { source })
}

/// Decoded batch response, indexed by call name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchResponse {
	results: Map<String, Value>,
}
impl BatchResponse {
	/// Decodes a raw response body.
	pub fn parse(body: &str) -> Result<Self, DecodeError> {
		Self::from_value(decode(body)?)
	}

	/// Wraps an already decoded envelope.
	pub fn from_value(value: Value) -> Result<Self, DecodeError> {
		match value {
			Value::Object(results) => Ok(Self { results }),
			_ => Err(DecodeError::NotAnObject),
		}
	}

	/// Call names present in the response, in body order.
	pub fn call_names(&self) -> impl Iterator<Item = &str> {
		self.results.keys().map(String::as_str)
	}

	/// Whole result for `call`.
	pub fn call(&self, call: &str) -> Option<&Value> {
		self.results.get(call)
	}

	/// One section of the result for `call`.
	pub fn section(&self, call: &str, section: Section) -> Result<&Value, DecodeError> {
		self.call(call)
			.ok_or_else(|| DecodeError::MissingCall { call: call.to_owned() })?
			.get(section.as_str())
			.ok_or_else(|| DecodeError::MissingSection { call: call.to_owned(), section })
	}

	/// `items` section of `call`.
	pub fn items(&self, call: &str) -> Result<&Value, DecodeError> {
		self.section(call, Section::Items)
	}

	/// `context` section of `call`.
	pub fn context(&self, call: &str) -> Result<&Value, DecodeError> {
		self.section(call, Section::Context)
	}

	/// Deserializes a section into `T`, reporting the JSON path of any mismatch.
	pub fn section_as<T>(&self, call: &str, section: Section) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(self.section(call, section)?).map_err(|source| {
			DecodeError::Shape { call: call.to_owned(), section, source }
		})
	}

	/// Deserializes the `items` section of `call`.
	pub fn items_as<T>(&self, call: &str) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		self.section_as(call, Section::Items)
	}

	/// Deserializes the `context` section of `call`.
	pub fn context_as<T>(&self, call: &str) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		self.section_as(call, Section::Context)
	}

	/// Server-side error message reported in the context of `call`, if any.
	pub fn error(&self, call: &str) -> Option<&str> {
		self.context(call).ok()?.get("error")?.as_str()
	}
}
