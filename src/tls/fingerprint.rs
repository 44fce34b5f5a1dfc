use rustls::client::{ServerCertVerified, ServerCertVerifier};
use rustls::{Certificate, ServerName};
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::time::SystemTime;

use crate::error::ConfigError;

const FINGERPRINT_LENGTH: usize = 32;

/// SHA-256 digest of a DER-encoded certificate.
///
/// Parsing accepts upper- or lowercase hex, with or without `:` separators. Display uses the
/// form printed by the server as `certSha256`: 64 uppercase hex digits, no separators.
///
/// **Example**
/// ```rust
/// # use outline_client::tls::fingerprint::Fingerprint;
/// let colons = "ab:".repeat(31) + "ab";
/// let fingerprint: Fingerprint = colons.parse().unwrap();
/// assert_eq!(fingerprint.to_string(), "AB".repeat(32));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LENGTH]);

impl Fingerprint {
	/// Computes the fingerprint of a DER-encoded certificate.
	pub fn of_der(der: &[u8]) -> Self {
		Self(Sha256::digest(der).into())
	}

	/// Returns the raw digest bytes.
	pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LENGTH] {
		&self.0
	}
}

impl FromStr for Fingerprint {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let digits: String = s.trim().chars().filter(|c| *c != ':').collect();
		let mut bytes = [0u8; FINGERPRINT_LENGTH];
		hex::decode_to_slice(&digits, &mut bytes)
			.map_err(|e| ConfigError::InvalidFingerprint(format!("{}: {}", s, e)))?;
		Ok(Self(bytes))
	}
}

impl Display for Fingerprint {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&hex::encode_upper(self.0))
	}
}

impl Debug for Fingerprint {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Fingerprint({})", self)
	}
}

/// Trusts exactly the server certificate whose SHA-256 digest matches the pinned [`Fingerprint`].
///
/// Chain-of-trust, hostname and validity period are not checked; the handshake signatures
/// still are, through the default [`ServerCertVerifier`] methods.
pub struct FingerprintVerifier {
	pinned: Fingerprint,
}

impl FingerprintVerifier {
	/// Constructs a verifier pinned to `pinned`.
	pub fn new(pinned: Fingerprint) -> Self {
		Self { pinned }
	}
}

impl ServerCertVerifier for FingerprintVerifier {
	fn verify_server_cert(
		&self, end_entity: &Certificate, _intermediates: &[Certificate], server_name: &ServerName,
		_scts: &mut dyn Iterator<Item = &[u8]>, _ocsp_response: &[u8], _now: SystemTime,
	) -> Result<ServerCertVerified, rustls::Error> {
		let presented = Fingerprint::of_der(&end_entity.0);
		if presented == self.pinned {
			Ok(ServerCertVerified::assertion())
		} else {
			tracing::error!(
				?server_name,
				expected = %self.pinned,
				presented = %presented,
				"Server certificate does not match pinned fingerprint"
			);
			Err(rustls::Error::General(format!(
				"certificate fingerprint mismatch: expected {}, got {}",
				self.pinned, presented
			)))
		}
	}
}
