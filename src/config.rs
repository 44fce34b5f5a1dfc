use std::env;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::tls::fingerprint::Fingerprint;

/// Environment variable holding the management API URL, secret path included.
pub const API_URL_ENV: &str = "OUTLINE_API_URL";
/// Environment variable holding the certificate fingerprint.
pub const CERT_SHA256_ENV: &str = "OUTLINE_CERT_SHA256";
/// Environment variable that disables TLS verification when set to `false` or `0`.
pub const VERIFY_TLS_ENV: &str = "OUTLINE_VERIFY_TLS";

/// Timeout applied to every request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings fixed for the lifetime of an [`crate::client::OutlineClient`].
///
/// The management API authenticates through the secret path of its URL, e.g.
/// `https://1.2.3.4:1234/3pQ4jf6qSr5WVeMO0XOo4z`, so the URL itself is a credential.
#[derive(Clone)]
pub struct ClientConfig {
	api_url: Url,
	cert_sha256: Option<Fingerprint>,
	verify_tls: bool,
	timeout: Duration,
}

impl ClientConfig {
	/// Constructs a configuration pinned to the certificate with fingerprint `cert_sha256`.
	///
	/// Pinning needs a TLS handshake, so `api_url` must use `https`.
	pub fn new(api_url: &str, cert_sha256: &str) -> Result<Self, ConfigError> {
		let mut config = Self::unpinned(api_url)?;
		if config.api_url.scheme() != "https" {
			return Err(ConfigError::UnsupportedUrl(format!(
				"scheme {} cannot carry a pinned certificate",
				config.api_url.scheme()
			)));
		}
		config.cert_sha256 = Some(cert_sha256.parse()?);
		Ok(config)
	}

	/// Constructs a configuration relying on standard certificate validation.
	pub fn unpinned(api_url: &str) -> Result<Self, ConfigError> {
		Ok(Self {
			api_url: parse_api_url(api_url)?,
			cert_sha256: None,
			verify_tls: true,
			timeout: DEFAULT_TIMEOUT,
		})
	}

	/// Reads the configuration from [`API_URL_ENV`], [`CERT_SHA256_ENV`] and [`VERIFY_TLS_ENV`].
	pub fn from_env() -> Result<Self, ConfigError> {
		let api_url = env::var(API_URL_ENV).map_err(|_| ConfigError::MissingEnv(API_URL_ENV))?;
		let config = match env::var(CERT_SHA256_ENV) {
			Ok(fingerprint) if !fingerprint.trim().is_empty() => Self::new(&api_url, &fingerprint)?,
			_ => Self::unpinned(&api_url)?,
		};
		let verify_tls = !matches!(
			env::var(VERIFY_TLS_ENV).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
			Ok("false") | Ok("0")
		);
		Ok(config.with_verify_tls(verify_tls))
	}

	/// Enables or disables TLS verification. Disabling it also disables pinning.
	pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
		self.verify_tls = verify_tls;
		self
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Returns the base URL of the management API.
	pub fn api_url(&self) -> &Url {
		&self.api_url
	}

	/// Returns the pinned certificate fingerprint, if any.
	pub fn cert_sha256(&self) -> Option<Fingerprint> {
		self.cert_sha256
	}

	/// Returns whether the server certificate is verified.
	pub fn verify_tls(&self) -> bool {
		self.verify_tls
	}

	/// Returns the per-request timeout.
	pub fn timeout(&self) -> Duration {
		self.timeout
	}
}

impl std::fmt::Debug for ClientConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		// The path is the API secret.
		f.debug_struct("ClientConfig")
			.field("api_url", &format_args!("{}://{}/<redacted>", self.api_url.scheme(), host_port(&self.api_url)))
			.field("cert_sha256", &self.cert_sha256)
			.field("verify_tls", &self.verify_tls)
			.field("timeout", &self.timeout)
			.finish()
	}
}

fn parse_api_url(api_url: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(api_url.trim())?;
	if !matches!(url.scheme(), "https" | "http") {
		return Err(ConfigError::UnsupportedUrl(format!("scheme {} is not http(s)", url.scheme())));
	}
	if url.cannot_be_a_base() || url.host().is_none() {
		return Err(ConfigError::UnsupportedUrl("url has no host".to_string()));
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ConfigError::UnsupportedUrl("url must not carry a query or fragment".to_string()));
	}
	Ok(url)
}

fn host_port(url: &Url) -> String {
	match (url.host_str(), url.port()) {
		(Some(host), Some(port)) => format!("{}:{}", host, port),
		(Some(host), None) => host.to_string(),
		_ => String::new(),
	}
}
