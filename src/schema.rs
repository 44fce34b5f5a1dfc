use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{FieldViolation, ValidationError};

/// Path reported for violations that concern the whole document.
pub const ROOT: &str = "$";

const MAX_ACTUAL_LEN: usize = 64;

/// A payload exchanged with the management API, described by a fixed field schema.
///
/// Every request and response type in [`crate::types`] implements this trait. The schema is
/// checked against the decoded JSON before it is turned into the typed record (responses) and
/// after the typed record is turned into JSON (requests).
pub trait Record: Serialize + DeserializeOwned {
	/// Declared fields of the record.
	const SCHEMA: &'static [FieldSpec];
}

/// Declaration of a single record field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
	/// Wire name of the field.
	pub name: &'static str,
	/// Whether the field must be present and non-null.
	pub required: bool,
	/// Whether an explicit `null` counts as absent. Ignored for required fields.
	pub nullable: bool,
	/// Type and value constraints of the field.
	pub kind: FieldKind,
}

impl FieldSpec {
	/// Declares a field that must be present.
	pub const fn required(name: &'static str, kind: FieldKind) -> Self {
		Self { name, required: true, nullable: false, kind }
	}

	/// Declares a field that may be missing or `null`.
	pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
		Self { name, required: false, nullable: true, kind }
	}

	/// Declares a field that may be missing but, when present, must not be `null`.
	pub const fn omittable(name: &'static str, kind: FieldKind) -> Self {
		Self { name, required: false, nullable: false, kind }
	}
}

/// Type and value constraints of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
	/// A JSON boolean.
	Bool,
	/// A JSON string with at least `min_len` characters.
	Str {
		/// Minimum number of characters.
		min_len: usize,
	},
	/// A JSON integer within `min..=max`.
	Int {
		/// Inclusive lower bound.
		min: i128,
		/// Inclusive upper bound.
		max: i128,
	},
	/// A nested object with its own schema.
	Record(&'static [FieldSpec]),
	/// An array of objects sharing one schema.
	List(&'static [FieldSpec]),
	/// An object mapping non-empty keys to non-negative integers.
	Counters,
}

/// Any string, including the empty one.
pub const STRING: FieldKind = FieldKind::Str { min_len: 0 };
/// A string with at least one character.
pub const NON_EMPTY_STRING: FieldKind = FieldKind::Str { min_len: 1 };
/// An integer that is zero or more.
pub const NON_NEGATIVE: FieldKind = FieldKind::Int { min: 0, max: u64::MAX as i128 };
/// A usable network port.
pub const PORT: FieldKind = FieldKind::Int { min: 1, max: u16::MAX as i128 };

impl FieldKind {
	fn describe(&self) -> String {
		match self {
			FieldKind::Bool => "boolean".to_string(),
			FieldKind::Str { min_len: 0 } => "string".to_string(),
			FieldKind::Str { min_len: 1 } => "non-empty string".to_string(),
			FieldKind::Str { min_len } => format!("string of at least {} characters", min_len),
			FieldKind::Int { min, max } if *max == u64::MAX as i128 => format!("integer >= {}", min),
			FieldKind::Int { min, max } => format!("integer in {}..={}", min, max),
			FieldKind::Record(_) => "object".to_string(),
			FieldKind::List(_) => "array of objects".to_string(),
			FieldKind::Counters => "object of non-negative integers".to_string(),
		}
	}
}

/// Validates `raw` against the schema of `T` and converts it into the typed record.
///
/// All violations are collected before returning, so the error names every offending field.
pub fn validate<T: Record>(raw: Value) -> Result<T, ValidationError> {
	check(&raw, T::SCHEMA)?;
	serde_json::from_value(raw)
		.map_err(|e| ValidationError::single(ROOT, "well-formed record", e.to_string()))
}

/// Checks `value` against `schema` without converting it.
pub fn check(value: &Value, schema: &[FieldSpec]) -> Result<(), ValidationError> {
	let mut violations = Vec::new();
	match value.as_object() {
		Some(object) => check_object(object, schema, "", &mut violations),
		None => violations.push(violation(ROOT, "object", Some(value))),
	}
	if violations.is_empty() {
		Ok(())
	} else {
		Err(ValidationError::new(violations))
	}
}

/// Parses wire text and validates it as `T`.
pub fn decode<T: Record>(body: &str) -> Result<T, ValidationError> {
	let raw: Value = serde_json::from_str(body)
		.map_err(|e| ValidationError::single(ROOT, "JSON document", e.to_string()))?;
	validate(raw)
}

/// Serializes `record` and validates the result as `T`, returning the wire text.
pub fn encode<T: Record>(record: &T) -> Result<String, ValidationError> {
	let value = serde_json::to_value(record)
		.map_err(|e| ValidationError::single(ROOT, "serializable record", e.to_string()))?;
	check(&value, T::SCHEMA)?;
	Ok(value.to_string())
}

fn check_object(
	object: &Map<String, Value>, schema: &[FieldSpec], prefix: &str, violations: &mut Vec<FieldViolation>,
) {
	for spec in schema {
		let path = join(prefix, spec.name);
		match object.get(spec.name) {
			None if !spec.required => {},
			Some(Value::Null) if !spec.required && spec.nullable => {},
			None => violations.push(violation(&path, &spec.kind.describe(), None)),
			Some(value) => check_value(value, &spec.kind, &path, violations),
		}
	}
}

fn check_value(value: &Value, kind: &FieldKind, path: &str, violations: &mut Vec<FieldViolation>) {
	match kind {
		FieldKind::Bool => {
			if !value.is_boolean() {
				violations.push(violation(path, &kind.describe(), Some(value)));
			}
		},
		FieldKind::Str { min_len } => match value.as_str() {
			Some(s) if s.chars().count() >= *min_len => {},
			_ => violations.push(violation(path, &kind.describe(), Some(value))),
		},
		FieldKind::Int { min, max } => match as_integer(value) {
			Some(n) if *min <= n && n <= *max => {},
			_ => violations.push(violation(path, &kind.describe(), Some(value))),
		},
		FieldKind::Record(schema) => match value.as_object() {
			Some(object) => check_object(object, schema, path, violations),
			None => violations.push(violation(path, &kind.describe(), Some(value))),
		},
		FieldKind::List(schema) => match value.as_array() {
			Some(items) => {
				for (index, item) in items.iter().enumerate() {
					let item_path = format!("{}[{}]", path, index);
					match item.as_object() {
						Some(object) => check_object(object, schema, &item_path, violations),
						None => violations.push(violation(&item_path, "object", Some(item))),
					}
				}
			},
			None => violations.push(violation(path, &kind.describe(), Some(value))),
		},
		FieldKind::Counters => match value.as_object() {
			Some(object) => {
				for (key, count) in object {
					if key.is_empty() {
						violations.push(violation(path, "non-empty key", Some(&Value::from(""))));
						continue;
					}
					// Keys are free-form, so they are quoted to keep the path unambiguous.
					let key_path = format!("{}[{}]", path, Value::from(key.as_str()));
					check_value(count, &NON_NEGATIVE, &key_path, violations);
				}
			},
			None => violations.push(violation(path, &kind.describe(), Some(value))),
		},
	}
}

fn as_integer(value: &Value) -> Option<i128> {
	value.as_i64().map(i128::from).or_else(|| value.as_u64().map(i128::from))
}

fn join(prefix: &str, name: &str) -> String {
	if prefix.is_empty() {
		name.to_string()
	} else {
		format!("{}.{}", prefix, name)
	}
}

fn violation(path: &str, expected: &str, actual: Option<&Value>) -> FieldViolation {
	let actual = match actual {
		None => "missing".to_string(),
		Some(value) => {
			let mut rendered = value.to_string();
			if rendered.len() > MAX_ACTUAL_LEN {
				let mut cut = MAX_ACTUAL_LEN;
				while !rendered.is_char_boundary(cut) {
					cut -= 1;
				}
				rendered.truncate(cut);
				rendered.push_str("...");
			}
			rendered
		},
	};
	FieldViolation { path: path.to_string(), expected: expected.to_string(), actual }
}
