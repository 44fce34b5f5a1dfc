use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A request field that tracks whether it was supplied at all.
///
/// The management API applies partial updates: a field missing from the body keeps its
/// server-side value, while an explicit `null` clears it. An `Option<T>` cannot tell the two
/// apart, so request records use [`Patch`] together with
/// `#[serde(default, skip_serializing_if = "Patch::is_absent")]`.
///
/// **Example**
/// ```rust
/// # use outline_client::util::patch::Patch;
/// let name: Patch<String> = Patch::from("office");
/// assert!(name.is_set());
/// assert!(Patch::<String>::default().is_absent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
	/// The field is omitted from the serialized body.
	#[default]
	Absent,
	/// The field is serialized as an explicit `null`.
	Null,
	/// The field is serialized with the given value.
	Set(T),
}

impl<T> Patch<T> {
	/// Returns `true` if the field will be omitted from the body.
	pub fn is_absent(&self) -> bool {
		matches!(self, Patch::Absent)
	}

	/// Returns `true` if the field carries a value.
	pub fn is_set(&self) -> bool {
		matches!(self, Patch::Set(_))
	}

	/// Returns a reference to the value, if any.
	pub fn as_set(&self) -> Option<&T> {
		match self {
			Patch::Set(value) => Some(value),
			_ => None,
		}
	}
}

impl<T> From<T> for Patch<T> {
	fn from(value: T) -> Self {
		Patch::Set(value)
	}
}

impl From<&str> for Patch<String> {
	fn from(value: &str) -> Self {
		Patch::Set(value.to_string())
	}
}

impl<T> From<Option<T>> for Patch<T> {
	/// `None` maps to [`Patch::Absent`], never to [`Patch::Null`].
	fn from(value: Option<T>) -> Self {
		value.map_or(Patch::Absent, Patch::Set)
	}
}

impl<T: Serialize> Serialize for Patch<T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			// Only reached when the field is not guarded by `skip_serializing_if`.
			Patch::Absent | Patch::Null => serializer.serialize_none(),
			Patch::Set(value) => value.serialize(serializer),
		}
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		// Missing fields never reach here; `#[serde(default)]` yields `Absent`.
		Ok(Option::<T>::deserialize(deserializer)?.map_or(Patch::Null, Patch::Set))
	}
}
