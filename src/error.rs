use reqwest::StatusCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors returned on interacting with [`crate::client::OutlineClient`].
///
/// No variant is ever retried by the client; callers decide their own retry policy.
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
	/// The client configuration was rejected at construction time.
	#[error("invalid client configuration: {0}")]
	Config(#[from] ConfigError),

	/// An outgoing request or an incoming response did not match its record schema.
	#[error("validation failed: {0}")]
	Validation(#[from] ValidationError),

	/// The request could not be completed: connection failure, certificate fingerprint
	/// mismatch or timeout.
	#[error("transport failure: {0}")]
	Transport(#[from] reqwest::Error),

	/// The server answered with a non-2xx status.
	#[error("server responded with {status}: {body}")]
	Api {
		/// HTTP status returned by the server.
		status: StatusCode,
		/// Response body, possibly empty.
		body: String,
	},
}

impl OutlineError {
	/// Returns the HTTP status of an [`OutlineError::Api`] error.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			OutlineError::Api { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns the schema violations of an [`OutlineError::Validation`] error.
	pub fn violations(&self) -> Option<&[FieldViolation]> {
		match self {
			OutlineError::Validation(err) => Some(err.violations()),
			_ => None,
		}
	}
}

/// Reasons a [`crate::config::ClientConfig`] or the underlying transport could not be built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The base URL could not be parsed.
	#[error("invalid api url: {0}")]
	InvalidUrl(#[from] url::ParseError),

	/// The base URL parsed but cannot address the management API.
	#[error("unsupported api url: {0}")]
	UnsupportedUrl(String),

	/// The certificate fingerprint is not 32 hex-encoded bytes.
	#[error("invalid certificate fingerprint: {0}")]
	InvalidFingerprint(String),

	/// A required environment variable is missing or not unicode.
	#[error("missing environment variable {0}")]
	MissingEnv(&'static str),

	/// The HTTP client could not be constructed.
	#[error("failed to build http client")]
	Transport(#[source] reqwest::Error),
}

/// A single field that failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
	/// Dotted path of the field, e.g. `accessKeys[1].port`. Counter keys are quoted, as in
	/// `bytesTransferredByUserId["1"]`. `$` denotes the whole document.
	pub path: String,
	/// The expected type or constraint.
	pub expected: String,
	/// The offending value rendered as JSON, or `missing`.
	pub actual: String,
}

impl Display for FieldViolation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: expected {}, got {}", self.path, self.expected, self.actual)
	}
}

/// Every field of a payload that failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
	violations: Vec<FieldViolation>,
}

impl ValidationError {
	pub(crate) fn new(violations: Vec<FieldViolation>) -> Self {
		Self { violations }
	}

	pub(crate) fn single(path: &str, expected: &str, actual: impl Into<String>) -> Self {
		Self::new(vec![FieldViolation {
			path: path.to_string(),
			expected: expected.to_string(),
			actual: actual.into(),
		}])
	}

	/// Returns all violations in schema order.
	pub fn violations(&self) -> &[FieldViolation] {
		&self.violations
	}

	/// Returns the violation reported for `path`, if any.
	pub fn field(&self, path: &str) -> Option<&FieldViolation> {
		self.violations.iter().find(|v| v.path == path)
	}
}

impl Display for ValidationError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} invalid field(s)", self.violations.len())?;
		for (i, violation) in self.violations.iter().enumerate() {
			let sep = if i == 0 { ": " } else { "; " };
			write!(f, "{}{}", sep, violation)?;
		}
		Ok(())
	}
}

impl Error for ValidationError {}
