use reqwest::Client;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::tls::fingerprint::{Fingerprint, FingerprintVerifier};

/// Certificate fingerprint parsing and the pinning verifier.
pub mod fingerprint;

/// How the server certificate is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustMode {
	/// Standard chain validation against the bundled webpki roots.
	WebPki,
	/// Only the certificate with the given fingerprint is accepted.
	Pinned(Fingerprint),
	/// Any certificate is accepted. Development use only.
	Insecure,
}

impl TrustMode {
	pub(crate) fn from_config(config: &ClientConfig) -> Self {
		match (config.verify_tls(), config.cert_sha256()) {
			(false, _) => TrustMode::Insecure,
			(true, Some(fingerprint)) => TrustMode::Pinned(fingerprint),
			(true, None) => TrustMode::WebPki,
		}
	}
}

/// Builds the HTTP client enforcing the trust mode of `config`.
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<Client, ConfigError> {
	let builder = Client::builder().timeout(config.timeout());
	let builder = match TrustMode::from_config(config) {
		TrustMode::WebPki => builder.use_rustls_tls(),
		TrustMode::Pinned(fingerprint) => builder.use_preconfigured_tls(pinned_tls_config(fingerprint)),
		TrustMode::Insecure => {
			tracing::warn!("TLS verification is disabled, any server certificate will be accepted");
			builder.use_rustls_tls().danger_accept_invalid_certs(true)
		},
	};
	builder.build().map_err(ConfigError::Transport)
}

fn pinned_tls_config(fingerprint: Fingerprint) -> rustls::ClientConfig {
	rustls::ClientConfig::builder()
		.with_safe_defaults()
		.with_custom_certificate_verifier(Arc::new(FingerprintVerifier::new(fingerprint)))
		.with_no_client_auth()
}

#[cfg(test)]
mod tests {
	use super::*;

	const URL: &str = "https://127.0.0.1:8443/SECRET";

	#[test]
	fn pinning_requires_verification() {
		let fingerprint = "AB".repeat(32);
		let pinned = ClientConfig::new(URL, &fingerprint).unwrap();
		assert!(matches!(TrustMode::from_config(&pinned), TrustMode::Pinned(_)));

		let insecure = pinned.with_verify_tls(false);
		assert_eq!(TrustMode::from_config(&insecure), TrustMode::Insecure);
	}

	#[test]
	fn unpinned_config_uses_webpki() {
		let config = ClientConfig::unpinned(URL).unwrap();
		assert_eq!(TrustMode::from_config(&config), TrustMode::WebPki);
	}

	#[test]
	fn builds_client_for_every_mode() {
		let fingerprint = "AB".repeat(32);
		let pinned = ClientConfig::new(URL, &fingerprint).unwrap();
		assert!(build_http_client(&pinned).is_ok());
		assert!(build_http_client(&pinned.clone().with_verify_tls(false)).is_ok());
		assert!(build_http_client(&ClientConfig::unpinned(URL).unwrap()).is_ok());
	}
}
