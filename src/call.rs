//! Typed remote call model and its wire fragment.
//!
//! An [`ApiCall`] names one remote operation, declares which parameters it accepts (and which
//! of those are compulsory), and carries per-instance values plus the two response filters.
//! Values are a closed set ([`ParamValue`]); [`ParamValue::Unset`] marks a parameter that is
//! not supplied and is left out of the serialized fragment.
//!
//! Compulsory parameters are enforced when written: they can never be set back to unset.
//! A compulsory parameter that was simply never written stays unset and is omitted from the
//! fragment; [`ApiCall::missing_compulsory`] reports those for callers who want to check
//! before sending.

pub mod descriptor;
pub mod value;

pub use descriptor::*;
pub use value::*;

// crates.io
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Parameter contract violations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CallError {
	/// Call names cannot be blank.
	#[error("The call name must not be blank.")]
	BlankCallName,
	/// Parameter names cannot be blank.
	#[error("The parameter name must not be blank.")]
	EmptyName,
	/// Parameter was never declared for this call.
	#[error("The parameter `{name}` is not declared.")]
	UnknownParameter {
		/// Offending parameter name.
		name: String,
	},
	/// Compulsory parameters cannot be unset.
	#[error("The parameter `{name}` is compulsory and cannot be unset.")]
	CompulsoryParameterUnset {
		/// Offending parameter name.
		name: String,
	},
	/// Parameter was declared twice.
	#[error("The parameter `{name}` is already declared.")]
	DuplicateParameter {
		/// Offending parameter name.
		name: String,
	},
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Parameter {
	name: String,
	value: ParamValue,
	compulsory: bool,
}

/// One remote operation invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiCall {
	name: String,
	parameters: Vec<Parameter>,
	items_filter: Vec<String>,
	context_filter: Vec<String>,
	access: AccessRequirements,
	returns: ResultShape,
}
impl ApiCall {
	/// Creates a call with no declared parameters.
	pub fn new(name: impl Into<String>) -> Result<Self, CallError> {
		let name = name.into();

		if name.trim().is_empty() {
			return Err(CallError::BlankCallName);
		}

		Ok(Self {
			name,
			parameters: Vec::new(),
			items_filter: Vec::new(),
			context_filter: Vec::new(),
			access: AccessRequirements::default(),
			returns: ResultShape::default(),
		})
	}

	/// Starts a builder for a call named `name`.
	pub fn builder(name: impl Into<String>) -> ApiCallBuilder {
		ApiCallBuilder::new(name)
	}

	/// Remote operation identifier.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Access tier flags.
	pub fn access(&self) -> AccessRequirements {
		self.access
	}

	/// Whether the call needs public access.
	pub fn requires_public_access(&self) -> bool {
		self.access.public
	}

	/// Whether the call needs user access.
	pub fn requires_user_access(&self) -> bool {
		self.access.user
	}

	/// Whether the call needs action access.
	pub fn requires_action_access(&self) -> bool {
		self.access.action
	}

	/// Whether the response carries `items`.
	pub fn returns_items(&self) -> bool {
		self.returns.items
	}

	/// Whether the response carries `context`.
	pub fn returns_context(&self) -> bool {
		self.returns.context
	}

	/// Registers an optional parameter, initially unset.
	pub fn declare_parameter(&mut self, name: impl Into<String>) -> Result<(), CallError> {
		self.declare(name.into(), false)
	}

	/// Registers a compulsory parameter, initially unset.
	pub fn declare_compulsory_parameter(&mut self, name: impl Into<String>) -> Result<(), CallError> {
		self.declare(name.into(), true)
	}

	fn declare(&mut self, name: String, compulsory: bool) -> Result<(), CallError> {
		if name.trim().is_empty() {
			return Err(CallError::EmptyName);
		}
		if self.find(&name).is_some() {
			return Err(CallError::DuplicateParameter { name });
		}

		self.parameters.push(Parameter { name, value: ParamValue::Unset, compulsory });

		Ok(())
	}

	/// Stores `value`, returning `false` instead of an error on any contract violation.
	pub fn try_set_value(&mut self, name: &str, value: impl Into<ParamValue>) -> bool {
		self.set_value(name, value).is_ok()
	}

	/// Stores `value`, replacing the previous one.
	///
	/// Fails when `name` is blank or undeclared, or when `value` is unset and the parameter is
	/// compulsory. The call is left untouched on failure.
	pub fn set_value(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<(), CallError> {
		let value = value.into();
		let parameter = self.find_mut(name)?;

		if value.is_unset() && parameter.compulsory {
			return Err(CallError::CompulsoryParameterUnset { name: name.to_owned() });
		}

		parameter.value = value;

		Ok(())
	}

	/// Looks up a value; `None` only when `name` is blank or undeclared.
	///
	/// A declared parameter that holds no value yields `Some(&ParamValue::Unset)`, the same
	/// answer as one explicitly cleared. Use [`ApiCall::parameters`] to inspect the full state.
	pub fn try_get_value(&self, name: &str) -> Option<&ParamValue> {
		self.get_value(name).ok()
	}

	/// Looks up a value, failing when `name` is blank or undeclared.
	pub fn get_value(&self, name: &str) -> Result<&ParamValue, CallError> {
		if name.trim().is_empty() {
			return Err(CallError::EmptyName);
		}

		self.find(name)
			.map(|parameter| &parameter.value)
			.ok_or_else(|| CallError::UnknownParameter { name: name.to_owned() })
	}

	/// Declared parameters with their current values, in declaration order.
	pub fn parameters(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
		self.parameters.iter().map(|parameter| (parameter.name.as_str(), &parameter.value))
	}

	/// Declared parameter names, in declaration order.
	pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
		self.parameters.iter().map(|parameter| parameter.name.as_str())
	}

	/// Compulsory parameter names, in declaration order.
	pub fn compulsory_parameter_names(&self) -> impl Iterator<Item = &str> {
		self.parameters
			.iter()
			.filter(|parameter| parameter.compulsory)
			.map(|parameter| parameter.name.as_str())
	}

	/// Whether `name` is declared and compulsory.
	pub fn is_compulsory(&self, name: &str) -> bool {
		self.find(name).is_some_and(|parameter| parameter.compulsory)
	}

	/// Compulsory parameters that have never been given a value.
	pub fn missing_compulsory(&self) -> Vec<&str> {
		self.parameters
			.iter()
			.filter(|parameter| parameter.compulsory && parameter.value.is_unset())
			.map(|parameter| parameter.name.as_str())
			.collect()
	}

	/// Field allow-list applied to `items`.
	pub fn items_filter(&self) -> &[String] {
		&self.items_filter
	}

	/// Replaces the `items` filter.
	pub fn set_items_filter<I, S>(&mut self, fields: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.items_filter = fields.into_iter().map(Into::into).collect();
	}

	/// Field allow-list applied to `context` (dotted paths such as `player.name`).
	pub fn context_filter(&self) -> &[String] {
		&self.context_filter
	}

	/// Replaces the `context` filter.
	pub fn set_context_filter<I, S>(&mut self, fields: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.context_filter = fields.into_iter().map(Into::into).collect();
	}

	/// The call as a JSON object, keys in wire order.
	pub fn to_json(&self) -> Value {
		let params = self
			.parameters
			.iter()
			.filter_map(|parameter| {
				parameter.value.to_json().map(|value| (parameter.name.clone(), value))
			})
			.collect::<Map<_, _>>();
		let mut fragment = Map::new();

		fragment.insert("call".into(), Value::String(self.name.clone()));
		fragment.insert("params".into(), Value::Object(params));
		fragment.insert("itemsFilter".into(), string_array(&self.items_filter));
		fragment.insert("contextFilter".into(), string_array(&self.context_filter));

		Value::Object(fragment)
	}

	/// Renders `{"call":..,"params":{..},"itemsFilter":[..],"contextFilter":[..]}`.
	///
	/// Unset parameters are omitted; empty filters render as `[]`.
	pub fn to_wire_fragment(&self) -> String {
		self.to_json().to_string()
	}

	fn find(&self, name: &str) -> Option<&Parameter> {
		self.parameters.iter().find(|parameter| parameter.name == name)
	}

	fn find_mut(&mut self, name: &str) -> Result<&mut Parameter, CallError> {
		if name.trim().is_empty() {
			return Err(CallError::EmptyName);
		}

		self.parameters
			.iter_mut()
			.find(|parameter| parameter.name == name)
			.ok_or_else(|| CallError::UnknownParameter { name: name.to_owned() })
	}
}

/// Builder for [`ApiCall`] values.
///
/// Declaration errors are deferred to [`ApiCallBuilder::build`], which reports the first one.
#[derive(Clone, Debug)]
pub struct ApiCallBuilder {
	name: String,
	parameters: Vec<(String, bool)>,
	values: Vec<(String, ParamValue)>,
	items_filter: Vec<String>,
	context_filter: Vec<String>,
	access: AccessRequirements,
	returns: ResultShape,
}
impl ApiCallBuilder {
	/// Creates a builder for a call named `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			parameters: Vec::new(),
			values: Vec::new(),
			items_filter: Vec::new(),
			context_filter: Vec::new(),
			access: AccessRequirements::default(),
			returns: ResultShape::default(),
		}
	}

	/// Declares an optional parameter.
	pub fn parameter(mut self, name: impl Into<String>) -> Self {
		self.parameters.push((name.into(), false));

		self
	}

	/// Declares a compulsory parameter.
	pub fn compulsory_parameter(mut self, name: impl Into<String>) -> Self {
		self.parameters.push((name.into(), true));

		self
	}

	/// Sets a value once all parameters are declared.
	pub fn value(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.values.push((name.into(), value.into()));

		self
	}

	/// Sets the `items` filter.
	pub fn items_filter<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.items_filter = fields.into_iter().map(Into::into).collect();

		self
	}

	/// Sets the `context` filter.
	pub fn context_filter<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.context_filter = fields.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the access tier flags.
	pub fn access(mut self, access: AccessRequirements) -> Self {
		self.access = access;

		self
	}

	/// Overrides the result shape flags.
	pub fn returns(mut self, returns: ResultShape) -> Self {
		self.returns = returns;

		self
	}

	/// Consumes the builder, declaring parameters first and then applying values.
	pub fn build(self) -> Result<ApiCall, CallError> {
		let mut call = ApiCall::new(self.name)?;

		for (name, compulsory) in self.parameters {
			call.declare(name, compulsory)?;
		}
		for (name, value) in self.values {
			call.set_value(&name, value)?;
		}

		call.items_filter = self.items_filter;
		call.context_filter = self.context_filter;
		call.access = self.access;
		call.returns = self.returns;

		Ok(call)
	}
}

fn string_array(values: &[String]) -> Value {
	Value::Array(values.iter().cloned().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn character_levels() -> ApiCall {
		ApiCall::builder("characters.getCharacterLevels")
			.compulsory_parameter("characterID")
			.parameter("levelMax")
			.parameter("imageSize")
			.build()
			.expect("Fixture call should build.")
	}

	#[test]
	fn clans_fragment_matches_wire_shape_exactly() {
		let mut call = ApiCall::new("characters.getClans").expect("Call name should be accepted.");

		call.set_items_filter(["name"]);

		assert_eq!(
			call.to_wire_fragment(),
			r#"{"call":"characters.getClans","params":{},"itemsFilter":["name"],"contextFilter":[]}"#,
		);
	}

	#[test]
	fn unset_parameters_are_omitted_but_zero_values_are_sent() {
		let mut call = ApiCall::builder("collections.getCollectionPage")
			.parameter("deckOnly")
			.parameter("page")
			.parameter("search")
			.parameter("clanID")
			.build()
			.expect("Fixture call should build.");

		call.set_value("deckOnly", false).expect("Optional bool should be accepted.");
		call.set_value("page", 0).expect("Optional int should be accepted.");
		call.set_value("search", "").expect("Optional string should be accepted.");

		assert_eq!(
			call.to_wire_fragment(),
			r#"{"call":"collections.getCollectionPage","params":{"deckOnly":false,"page":0,"search":""},"itemsFilter":[],"contextFilter":[]}"#,
		);
	}

	#[test]
	fn params_follow_declaration_order() {
		let mut call = character_levels();

		call.set_value("imageSize", "small").expect("Value should be accepted.");
		call.set_value("characterID", 1234).expect("Value should be accepted.");

		assert_eq!(
			call.to_wire_fragment(),
			r#"{"call":"characters.getCharacterLevels","params":{"characterID":1234,"imageSize":"small"},"itemsFilter":[],"contextFilter":[]}"#,
		);
	}

	#[test]
	fn unwritten_compulsory_parameter_is_omitted_and_reported() {
		let call = character_levels();

		assert!(!call.to_wire_fragment().contains("characterID"));
		assert_eq!(call.missing_compulsory(), ["characterID"]);
	}

	#[test]
	fn compulsory_parameter_rejects_unset_in_both_variants() {
		let mut call = character_levels();

		assert_eq!(
			call.set_value("characterID", ParamValue::Unset),
			Err(CallError::CompulsoryParameterUnset { name: "characterID".into() }),
		);
		assert!(!call.try_set_value("characterID", None::<i64>));
		assert!(call.try_set_value("characterID", 7));
		assert_eq!(call.get_value("characterID"), Ok(&ParamValue::Int(7)));
		assert!(!call.try_set_value("characterID", ParamValue::Unset));
		assert_eq!(call.get_value("characterID"), Ok(&ParamValue::Int(7)));
	}

	#[test]
	fn optional_parameter_can_be_cleared() {
		let mut call = character_levels();

		call.set_value("levelMax", 5).expect("Value should be accepted.");
		call.set_value("levelMax", None::<i64>).expect("Clearing should be accepted.");

		assert_eq!(call.try_get_value("levelMax"), Some(&ParamValue::Unset));
		assert!(!call.to_wire_fragment().contains("levelMax"));
	}

	#[test]
	fn name_failures_are_distinguished() {
		let mut call = character_levels();

		assert_eq!(call.set_value("  ", 1), Err(CallError::EmptyName));
		assert_eq!(
			call.set_value("unknown", 1),
			Err(CallError::UnknownParameter { name: "unknown".into() }),
		);
		assert!(!call.try_set_value("", 1));
		assert!(!call.try_set_value("unknown", 1));
		assert_eq!(call.get_value(""), Err(CallError::EmptyName));
		assert_eq!(call.get_value("nope"), Err(CallError::UnknownParameter { name: "nope".into() }));
		assert_eq!(call.try_get_value("nope"), None);
		assert_eq!(call.try_get_value(""), None);
	}

	#[test]
	fn unset_lookup_succeeds_with_default() {
		let call = character_levels();

		assert_eq!(call.try_get_value("levelMax"), Some(&ParamValue::default()));
	}

	#[test]
	fn declarations_reject_duplicates_and_blanks() {
		let mut call = ApiCall::new("general.getPlayer").expect("Call name should be accepted.");

		call.declare_parameter("imageSize").expect("First declaration should succeed.");

		assert_eq!(
			call.declare_parameter("imageSize"),
			Err(CallError::DuplicateParameter { name: "imageSize".into() }),
		);
		assert_eq!(
			call.declare_compulsory_parameter("imageSize"),
			Err(CallError::DuplicateParameter { name: "imageSize".into() }),
		);
		assert_eq!(call.declare_parameter(" "), Err(CallError::EmptyName));
		assert_eq!(ApiCall::new(""), Err(CallError::BlankCallName));
	}

	#[test]
	fn builder_applies_values_filters_and_flags() {
		let call = ApiCall::builder("players.setLanguage")
			.compulsory_parameter("languages")
			.value("languages", vec!["en"])
			.context_filter(["player.name", "player.level"])
			.access(AccessRequirements::USER)
			.returns(ResultShape::CONTEXT)
			.build()
			.expect("Builder should succeed.");

		assert!(call.requires_user_access());
		assert!(!call.requires_public_access());
		assert!(call.returns_context());
		assert!(!call.returns_items());
		assert_eq!(
			call.to_wire_fragment(),
			r#"{"call":"players.setLanguage","params":{"languages":["en"]},"itemsFilter":[],"contextFilter":["player.name","player.level"]}"#,
		);
	}

	#[test]
	fn builder_reports_value_for_undeclared_parameter() {
		let err = ApiCall::builder("guilds.sendGuildMsg")
			.compulsory_parameter("msg")
			.value("message", "hi")
			.build()
			.expect_err("Undeclared parameter should fail.");

		assert_eq!(err, CallError::UnknownParameter { name: "message".into() });
	}

	#[test]
	fn call_name_is_json_escaped() {
		let call = ApiCall::new("odd\"name").expect("Call name should be accepted.");

		assert!(call.to_wire_fragment().starts_with(r#"{"call":"odd\"name","#));
	}
}
