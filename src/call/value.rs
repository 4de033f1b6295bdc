//! Closed set of values a call parameter can hold.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Scalar allowed inside a [`ParamValue::List`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamItem {
	/// JSON boolean.
	Bool(bool),
	/// JSON integer.
	Int(i64),
	/// JSON string.
	Str(String),
}
impl From<&ParamItem> for Value {
	fn from(item: &ParamItem) -> Self {
		match item {
			ParamItem::Bool(value) => Value::Bool(*value),
			ParamItem::Int(value) => Value::from(*value),
			ParamItem::Str(value) => Value::String(value.clone()),
		}
	}
}
impl From<bool> for ParamItem {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<i32> for ParamItem {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}
impl From<i64> for ParamItem {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}
impl From<&str> for ParamItem {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}
impl From<String> for ParamItem {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

/// Value held by a declared parameter.
///
/// [`ParamValue::Unset`] means "not supplied": it is never serialized, and it is distinct from
/// every zero, `false` or empty value, all of which are sent as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParamValue {
	#[default]
	/// Not supplied; omitted from the wire fragment.
	Unset,
	/// JSON boolean.
	Bool(bool),
	/// JSON integer.
	Int(i64),
	/// JSON string.
	Str(String),
	/// JSON array of scalars.
	List(Vec<ParamItem>),
}
impl ParamValue {
	/// Whether the value is [`ParamValue::Unset`].
	pub fn is_unset(&self) -> bool {
		matches!(self, Self::Unset)
	}

	/// Boolean payload, if any.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	/// Integer payload, if any.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(*value),
			_ => None,
		}
	}

	/// String payload, if any.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(value) => Some(value),
			_ => None,
		}
	}

	/// List payload, if any.
	pub fn as_list(&self) -> Option<&[ParamItem]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// JSON rendering; `None` for [`ParamValue::Unset`].
	pub fn to_json(&self) -> Option<Value> {
		match self {
			Self::Unset => None,
			Self::Bool(value) => Some(Value::Bool(*value)),
			Self::Int(value) => Some(Value::from(*value)),
			Self::Str(value) => Some(Value::String(value.clone())),
			Self::List(items) => Some(Value::Array(items.iter().map(Value::from).collect())),
		}
	}
}
impl From<bool> for ParamValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<i32> for ParamValue {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}
impl From<i64> for ParamValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}
impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}
impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}
impl<T> From<Vec<T>> for ParamValue
where
	T: Into<ParamItem>,
{
	fn from(values: Vec<T>) -> Self {
		Self::List(values.into_iter().map(Into::into).collect())
	}
}
impl<T> From<Option<T>> for ParamValue
where
	T: Into<ParamValue>,
{
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or_default()
	}
}
impl Display for ParamValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self.to_json() {
			Some(json) => Display::fmt(&json, f),
			None => f.write_str("<unset>"),
		}
	}
}
