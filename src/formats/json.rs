//! JSON API wrapper over the `json` crate, with typed getters that report the key path on failure.
//!
//! Settings documents treat every field as optional, so most getters here return `Ok(None)`
//! for both missing keys and explicit `null`s, and only fail on a value of the wrong type.

use json::JsonValue;

pub(crate) trait SerialExtend {
	fn as_object(&self) -> Option<&json::object::Object>;
}

impl SerialExtend for json::JsonValue {
	fn as_object(&self) -> Option<&json::object::Object> {
		if let json::JsonValue::Object(obj) = self {
			Some(obj)
		} else {
			None
		}
	}
}

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
	#[error("Value at {0:?} is not an object")]
	ValueIsNotObject(String),
	#[error("Value at {0:?} is not a list")]
	ValueIsNotList(String),
	#[error("Value at {0:?} is not a string")]
	ValueIsNotString(String),
	#[error("Value at {0:?} is not a number")]
	ValueIsNotNumber(String),
	#[error("Error in list at index {index}\n  - {inner}")]
	ErrorInList { index: usize, inner: Box<JsonError> },
	#[error("Error in object at {key:?}\n  - {inner}")]
	ErrorInObject { key: String, inner: Box<JsonError> },
}

impl JsonError {
	pub fn nested(self, key: &str) -> Self {
		Self::ErrorInObject {
			key: key.to_owned(),
			inner: Box::new(self),
		}
	}

	pub fn in_list(self, index: usize) -> Self {
		Self::ErrorInList {
			index,
			inner: Box::new(self),
		}
	}
}

#[derive(Clone, Copy)]
pub struct JsonObject<'a>(pub &'a json::object::Object);

impl<'a> JsonObject<'a> {
	/// Wraps `value` if it is an object, naming it `what` in the error otherwise.
	pub fn from_value(what: &str, value: &'a JsonValue) -> JsonResult<Self> {
		match value.as_object() {
			Some(obj) => Ok(JsonObject(obj)),
			None => Err(JsonError::ValueIsNotObject(what.to_owned())),
		}
	}

	/// `None` for both absent keys and `null` values.
	fn get(&self, key: &str) -> Option<&'a JsonValue> {
		self.0.get(key).filter(|val| !val.is_null())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a JsonValue)> {
		self.0.iter()
	}

	pub fn get_object(&self, key: &str) -> JsonResult<Option<JsonObject<'a>>> {
		self.get(key).map(|val| JsonObject::from_value(key, val)).transpose()
	}

	pub fn get_list(&self, key: &str) -> JsonResult<Option<&'a [JsonValue]>> {
		match self.get(key) {
			None => Ok(None),
			Some(JsonValue::Array(arr)) => Ok(Some(arr)),
			Some(_) => Err(JsonError::ValueIsNotList(key.to_owned())),
		}
	}

	pub fn get_str(&self, key: &str) -> JsonResult<Option<&'a str>> {
		match self.get(key) {
			None => Ok(None),
			Some(val) => match val.as_str() {
				Some(s) => Ok(Some(s)),
				None => Err(JsonError::ValueIsNotString(key.to_owned())),
			},
		}
	}

	pub fn get_f64(&self, key: &str) -> JsonResult<Option<f64>> {
		match self.get(key) {
			None => Ok(None),
			Some(val) => match val.as_number() {
				Some(number) => Ok(Some(number.into())),
				None => Err(JsonError::ValueIsNotNumber(key.to_owned())),
			},
		}
	}

	/// A list of strings, with the offending index nested in the error.
	pub fn get_str_list(&self, key: &str) -> JsonResult<Option<Vec<String>>> {
		let list = match self.get_list(key)? {
			Some(list) => list,
			None => return Ok(None),
		};

		list.iter()
			.enumerate()
			.map(|(i, val)| match val.as_str() {
				Some(s) => Ok(s.to_owned()),
				None => Err(JsonError::ValueIsNotString(i.to_string()).in_list(i).nested(key)),
			})
			.collect::<JsonResult<Vec<_>>>()
			.map(Some)
	}
}
