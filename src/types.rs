use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

use crate::error::ValidationError;
use crate::schema::{FieldKind, FieldSpec, Record, NON_EMPTY_STRING, NON_NEGATIVE, PORT, STRING};
use crate::util::patch::Patch;

const DATA_LIMIT_FIELDS: &[FieldSpec] = &[FieldSpec::required("bytes", NON_NEGATIVE)];

const ACCESS_KEY_FIELDS: &[FieldSpec] = &[
	FieldSpec::required("id", NON_EMPTY_STRING),
	FieldSpec::required("name", STRING),
	FieldSpec::required("password", NON_EMPTY_STRING),
	FieldSpec::required("port", PORT),
	FieldSpec::required("method", NON_EMPTY_STRING),
	FieldSpec::required("accessUrl", NON_EMPTY_STRING),
	FieldSpec::optional("dataLimit", FieldKind::Record(DATA_LIMIT_FIELDS)),
];

const TUNNEL_TIME_FIELDS: &[FieldSpec] = &[FieldSpec::required("seconds", NON_NEGATIVE)];

const KEY_METRICS_FIELDS: &[FieldSpec] = &[
	FieldSpec::required("accessKeyId", NON_NEGATIVE),
	FieldSpec::optional("tunnelTime", FieldKind::Record(TUNNEL_TIME_FIELDS)),
	FieldSpec::optional("dataTransferred", FieldKind::Record(DATA_LIMIT_FIELDS)),
];

const SERVER_METRICS_FIELDS: &[FieldSpec] = &[
	FieldSpec::optional("tunnelTime", FieldKind::Record(TUNNEL_TIME_FIELDS)),
	FieldSpec::optional("dataTransferred", FieldKind::Record(DATA_LIMIT_FIELDS)),
];

// Optional fields that are not `Option` still have to accept an explicit `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A byte ceiling applied to an access key or, as the server default, to every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLimit {
	/// Maximum number of bytes.
	pub bytes: u64,
}

impl DataLimit {
	/// Constructs a limit of `bytes`.
	pub fn new(bytes: u64) -> Self {
		Self { bytes }
	}
}

impl TryFrom<i64> for DataLimit {
	type Error = ValidationError;

	/// Rejects negative byte counts.
	fn try_from(bytes: i64) -> Result<Self, Self::Error> {
		u64::try_from(bytes)
			.map(DataLimit::new)
			.map_err(|_| ValidationError::single("bytes", "integer >= 0", bytes.to_string()))
	}
}

impl Record for DataLimit {
	const SCHEMA: &'static [FieldSpec] = DATA_LIMIT_FIELDS;
}

/// Information about the server, as returned by `GET /server`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
	/// Display name of the server.
	pub name: String,
	/// Unique identifier assigned by the server.
	pub server_id: String,
	/// Whether the server shares anonymous metrics.
	pub metrics_enabled: bool,
	/// Creation time in milliseconds since the Unix epoch.
	pub created_timestamp_ms: u64,
	/// Port assigned to newly created access keys.
	pub port_for_new_access_keys: u16,
	/// Server software version.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	/// Hostname embedded into access URLs.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hostname_for_access_keys: Option<String>,
	/// Default data limit applied to every access key without its own limit.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_key_data_limit: Option<DataLimit>,
}

impl Record for ServerInfo {
	const SCHEMA: &'static [FieldSpec] = &[
		FieldSpec::required("name", STRING),
		FieldSpec::required("serverId", NON_EMPTY_STRING),
		FieldSpec::required("metricsEnabled", FieldKind::Bool),
		FieldSpec::required("createdTimestampMs", NON_NEGATIVE),
		FieldSpec::required("portForNewAccessKeys", PORT),
		FieldSpec::optional("version", STRING),
		FieldSpec::optional("hostnameForAccessKeys", STRING),
		FieldSpec::optional("accessKeyDataLimit", FieldKind::Record(DATA_LIMIT_FIELDS)),
	];
}

/// A server-issued credential granting access to the VPN.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKey {
	/// Identifier assigned by the server.
	pub id: String,
	/// Display name, possibly empty.
	pub name: String,
	/// Shadowsocks password.
	pub password: String,
	/// Port the key listens on.
	pub port: u16,
	/// Encryption method, e.g. `chacha20-ietf-poly1305`.
	pub method: String,
	/// Shareable `ss://` connection URI.
	pub access_url: String,
	/// Data limit applied to this key only.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data_limit: Option<DataLimit>,
}

impl Debug for AccessKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AccessKey")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("password", &"<redacted>")
			.field("port", &self.port)
			.field("method", &self.method)
			.field("access_url", &"<redacted>")
			.field("data_limit", &self.data_limit)
			.finish()
	}
}

impl Record for AccessKey {
	const SCHEMA: &'static [FieldSpec] = ACCESS_KEY_FIELDS;
}

/// All access keys on the server, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeyList {
	/// The access keys.
	pub access_keys: Vec<AccessKey>,
}

impl Record for AccessKeyList {
	const SCHEMA: &'static [FieldSpec] =
		&[FieldSpec::required("accessKeys", FieldKind::List(ACCESS_KEY_FIELDS))];
}

/// Bytes transferred per access key, as returned by `GET /metrics/transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
	/// Cumulative bytes keyed by access key id.
	pub bytes_transferred_by_user_id: BTreeMap<String, u64>,
}

impl Record for Metrics {
	const SCHEMA: &'static [FieldSpec] =
		&[FieldSpec::required("bytesTransferredByUserId", FieldKind::Counters)];
}

/// Whether the server shares anonymous metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsStatus {
	/// The current setting.
	pub metrics_enabled: bool,
}

impl Record for MetricsStatus {
	const SCHEMA: &'static [FieldSpec] = &[FieldSpec::required("metricsEnabled", FieldKind::Bool)];
}

/// Accumulated tunnel time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelTime {
	/// Seconds spent connected.
	pub seconds: u64,
}

/// Accumulated transferred data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTransferred {
	/// Bytes transferred.
	pub bytes: u64,
}

/// Server-wide totals of the experimental metrics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMetrics {
	/// Total tunnel time over the window.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tunnel_time: Option<TunnelTime>,
	/// Total transferred data over the window.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data_transferred: Option<DataTransferred>,
}

/// Per-key totals of the experimental metrics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeyMetrics {
	/// Numeric id of the access key these totals belong to.
	pub access_key_id: u64,
	/// Tunnel time of this key over the window.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tunnel_time: Option<TunnelTime>,
	/// Transferred data of this key over the window.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data_transferred: Option<DataTransferred>,
}

/// Server and per-key metrics from `GET /experimental/server/metrics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentalMetrics {
	/// Server-wide totals.
	#[serde(default, deserialize_with = "null_as_default")]
	pub server: ServerMetrics,
	/// Per-key totals.
	#[serde(default, deserialize_with = "null_as_default")]
	pub access_keys: Vec<AccessKeyMetrics>,
}

impl Record for ExperimentalMetrics {
	const SCHEMA: &'static [FieldSpec] = &[
		FieldSpec::optional("server", FieldKind::Record(SERVER_METRICS_FIELDS)),
		FieldSpec::optional("accessKeys", FieldKind::List(KEY_METRICS_FIELDS)),
	];
}

/// Body of `POST /access-keys`. Every field is optional; omitted fields are chosen by the server.
///
/// Fields may be left [`Patch::Absent`] but never [`Patch::Null`]: the server has no value to
/// clear on a key it has not created yet, so an explicit `null` is rejected before sending.
///
/// **Example**
/// ```rust
/// # use outline_client::types::CreateAccessKeyRequest;
/// let request = CreateAccessKeyRequest::new().name("laptop").port(8388);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateAccessKeyRequest {
	/// Display name.
	#[serde(default, skip_serializing_if = "Patch::is_absent")]
	pub name: Patch<String>,
	/// Shadowsocks password.
	#[serde(default, skip_serializing_if = "Patch::is_absent")]
	pub password: Patch<String>,
	/// Port to listen on.
	#[serde(default, skip_serializing_if = "Patch::is_absent")]
	pub port: Patch<u16>,
	/// Encryption method.
	#[serde(default, skip_serializing_if = "Patch::is_absent")]
	pub method: Patch<String>,
	/// Data limit of the new key.
	#[serde(default, skip_serializing_if = "Patch::is_absent")]
	pub limit: Patch<DataLimit>,
}

impl CreateAccessKeyRequest {
	/// Constructs an empty request; the server picks every value.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the display name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Patch::Set(name.into());
		self
	}

	/// Sets the password.
	pub fn password(mut self, password: impl Into<String>) -> Self {
		self.password = Patch::Set(password.into());
		self
	}

	/// Sets the port.
	pub fn port(mut self, port: u16) -> Self {
		self.port = Patch::Set(port);
		self
	}

	/// Sets the encryption method.
	pub fn method(mut self, method: impl Into<String>) -> Self {
		self.method = Patch::Set(method.into());
		self
	}

	/// Sets the data limit.
	pub fn limit(mut self, limit: DataLimit) -> Self {
		self.limit = Patch::Set(limit);
		self
	}

	/// Returns `true` if no field was supplied, in which case no body is sent.
	pub fn is_empty(&self) -> bool {
		self.name.is_absent()
			&& self.password.is_absent()
			&& self.port.is_absent()
			&& self.method.is_absent()
			&& self.limit.is_absent()
	}
}

impl Record for CreateAccessKeyRequest {
	const SCHEMA: &'static [FieldSpec] = &[
		FieldSpec::omittable("name", STRING),
		FieldSpec::omittable("password", NON_EMPTY_STRING),
		FieldSpec::omittable("port", PORT),
		FieldSpec::omittable("method", NON_EMPTY_STRING),
		FieldSpec::omittable("limit", FieldKind::Record(DATA_LIMIT_FIELDS)),
	];
}

/// Body of the rename operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRequest {
	/// The new name.
	pub name: String,
}

impl Record for NameRequest {
	const SCHEMA: &'static [FieldSpec] = &[FieldSpec::required("name", NON_EMPTY_STRING)];
}

/// Body of `PUT /server/hostname-for-access-keys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostnameRequest {
	/// Hostname or IP address embedded into access URLs.
	pub hostname: String,
}

impl Record for HostnameRequest {
	const SCHEMA: &'static [FieldSpec] = &[FieldSpec::required("hostname", NON_EMPTY_STRING)];
}

/// Body of `PUT /server/port-for-new-access-keys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRequest {
	/// Port for new access keys.
	pub port: u16,
}

impl Record for PortRequest {
	const SCHEMA: &'static [FieldSpec] = &[FieldSpec::required("port", PORT)];
}

/// Body of the data limit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLimitRequest {
	/// The limit to apply.
	pub limit: DataLimit,
}

impl Record for DataLimitRequest {
	const SCHEMA: &'static [FieldSpec] =
		&[FieldSpec::required("limit", FieldKind::Record(DATA_LIMIT_FIELDS))];
}

/// Body of `PUT /metrics/enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsEnabledRequest {
	/// The new setting.
	pub metrics_enabled: bool,
}

impl Record for MetricsEnabledRequest {
	const SCHEMA: &'static [FieldSpec] = &[FieldSpec::required("metricsEnabled", FieldKind::Bool)];
}
