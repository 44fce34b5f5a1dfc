use crate::error::ValidationError;
use crate::schema::{self, Record};

mod private {
	pub trait Sealed {}
	impl Sealed for super::Structured {}
	impl Sealed for super::RawJson {}
}

/// Selects what successful read operations of [`crate::client::OutlineClient`] return.
///
/// The choice is made once, through the client's type parameter, rather than per call.
pub trait ResponseFormat: private::Sealed {
	/// What an operation whose response record is `T` returns.
	type Output<T: Record>;

	/// Turns a successful response body into the output for record `T`.
	fn render<T: Record>(body: String) -> Result<Self::Output<T>, ValidationError>;
}

/// Responses are validated and returned as typed records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Structured;

/// Responses are returned as the untouched wire text, without validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawJson;

impl ResponseFormat for Structured {
	type Output<T: Record> = T;

	fn render<T: Record>(body: String) -> Result<T, ValidationError> {
		schema::decode(&body)
	}
}

impl ResponseFormat for RawJson {
	type Output<T: Record> = String;

	fn render<T: Record>(body: String) -> Result<String, ValidationError> {
		Ok(body)
	}
}
