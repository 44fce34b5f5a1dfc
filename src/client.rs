use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use std::marker::PhantomData;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ConfigError, OutlineError, ValidationError};
use crate::format::{RawJson, ResponseFormat, Structured};
use crate::routes;
use crate::schema::{self, Record};
use crate::tls::build_http_client;
use crate::types::{
	AccessKey, AccessKeyList, CreateAccessKeyRequest, DataLimit, DataLimitRequest, ExperimentalMetrics,
	HostnameRequest, Metrics, MetricsEnabledRequest, MetricsStatus, NameRequest, PortRequest, ServerInfo,
};

const APPLICATION_JSON: &str = "application/json";

/// Window used by [`OutlineClient::get_experimental_metrics`].
pub const DEFAULT_METRICS_WINDOW: &str = "30d";

/// Thin-client to manage an Outline VPN server through its management API.
///
/// The type parameter fixes what read operations return: [`Structured`] yields validated
/// records, [`RawJson`] yields the untouched response text. Mutating operations return `()` in
/// both modes once the server acknowledged them.
///
/// Every call issues exactly one request and is never retried. The client holds no mirror of
/// server state; re-fetch to observe the effect of a mutation.
#[derive(Debug, Clone)]
pub struct OutlineClient<F: ResponseFormat = Structured> {
	config: ClientConfig,
	client: Client,
	format: PhantomData<F>,
}

impl OutlineClient<Structured> {
	/// Constructs a client returning validated records.
	pub fn new(config: ClientConfig) -> Result<Self, OutlineError> {
		let client = build_http_client(&config)?;
		Ok(Self::from_client(config, client))
	}
}

impl OutlineClient<RawJson> {
	/// Constructs a client returning raw response text.
	pub fn raw(config: ClientConfig) -> Result<Self, OutlineError> {
		let client = build_http_client(&config)?;
		Ok(Self::from_client(config, client))
	}
}

impl<F: ResponseFormat> OutlineClient<F> {
	/// Constructs a client from a given [`reqwest::Client`].
	///
	/// The certificate trust settings of `config` are not applied to `client`.
	pub fn from_client(config: ClientConfig, client: Client) -> Self {
		Self { config, client, format: PhantomData }
	}

	/// Returns the underlying configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Fetches information about the server.
	pub async fn get_server_info(&self) -> Result<F::Output<ServerInfo>, OutlineError> {
		self.get::<ServerInfo>(&[routes::SERVER], &[]).await
	}

	/// Renames the server. `name` must not be empty.
	pub async fn rename_server(&self, name: &str) -> Result<(), OutlineError> {
		self.put(&[routes::NAME], &NameRequest { name: name.to_string() }).await
	}

	/// Changes the hostname or IP address embedded into access URLs.
	pub async fn set_hostname(&self, hostname: &str) -> Result<(), OutlineError> {
		let request = HostnameRequest { hostname: hostname.to_string() };
		self.put(&[routes::SERVER, routes::HOSTNAME_FOR_ACCESS_KEYS], &request).await
	}

	/// Changes the port assigned to newly created access keys.
	///
	/// Port `0` is rejected before sending. A port already in use surfaces as an
	/// [`OutlineError::Api`] with status `409 Conflict`.
	pub async fn update_server_port(&self, port: u16) -> Result<(), OutlineError> {
		self.put(&[routes::SERVER, routes::PORT_FOR_NEW_ACCESS_KEYS], &PortRequest { port }).await
	}

	/// Sets the data limit applied to every access key without a limit of its own.
	pub async fn set_default_data_limit(&self, limit: DataLimit) -> Result<(), OutlineError> {
		self.put(&[routes::SERVER, routes::ACCESS_KEY_DATA_LIMIT], &DataLimitRequest { limit }).await
	}

	/// Removes the server-wide default data limit.
	pub async fn remove_default_data_limit(&self) -> Result<(), OutlineError> {
		self.delete(&[routes::SERVER, routes::ACCESS_KEY_DATA_LIMIT]).await
	}

	/// Fetches whether the server shares anonymous metrics.
	pub async fn get_metrics_status(&self) -> Result<F::Output<MetricsStatus>, OutlineError> {
		self.get::<MetricsStatus>(&[routes::METRICS, routes::ENABLED], &[]).await
	}

	/// Enables or disables sharing of anonymous metrics.
	pub async fn set_metrics_enabled(&self, enabled: bool) -> Result<(), OutlineError> {
		let request = MetricsEnabledRequest { metrics_enabled: enabled };
		self.put(&[routes::METRICS, routes::ENABLED], &request).await
	}

	/// Enables sharing of anonymous metrics.
	pub async fn enable_metrics(&self) -> Result<(), OutlineError> {
		self.set_metrics_enabled(true).await
	}

	/// Disables sharing of anonymous metrics.
	pub async fn disable_metrics(&self) -> Result<(), OutlineError> {
		self.set_metrics_enabled(false).await
	}

	/// Creates a new access key.
	///
	/// Fields left unset in `request` are chosen by the server. When no field is set the request
	/// carries no body at all. The returned key always reflects what the server assigned.
	pub async fn create_access_key(
		&self, request: &CreateAccessKeyRequest,
	) -> Result<F::Output<AccessKey>, OutlineError> {
		let body = if request.is_empty() { None } else { Some(schema::encode(request)?) };
		let payload = self.send(Method::POST, &[routes::ACCESS_KEYS], &[], body).await?;
		Ok(F::render::<AccessKey>(payload)?)
	}

	/// Fetches a single access key.
	pub async fn get_access_key(&self, key_id: &str) -> Result<F::Output<AccessKey>, OutlineError> {
		self.get::<AccessKey>(&[routes::ACCESS_KEYS, key_segment(key_id)?], &[]).await
	}

	/// Fetches all access keys, in server order.
	pub async fn get_access_keys(&self) -> Result<F::Output<AccessKeyList>, OutlineError> {
		self.get::<AccessKeyList>(&[routes::ACCESS_KEYS], &[]).await
	}

	/// Renames an access key. `name` must not be empty.
	pub async fn rename_access_key(&self, key_id: &str, name: &str) -> Result<(), OutlineError> {
		let request = NameRequest { name: name.to_string() };
		self.put(&[routes::ACCESS_KEYS, key_segment(key_id)?, routes::NAME], &request).await
	}

	/// Deletes an access key.
	pub async fn delete_access_key(&self, key_id: &str) -> Result<(), OutlineError> {
		self.delete(&[routes::ACCESS_KEYS, key_segment(key_id)?]).await
	}

	/// Sets the data limit of a single access key.
	pub async fn set_access_key_data_limit(&self, key_id: &str, limit: DataLimit) -> Result<(), OutlineError> {
		let segments = [routes::ACCESS_KEYS, key_segment(key_id)?, routes::DATA_LIMIT];
		self.put(&segments, &DataLimitRequest { limit }).await
	}

	/// Removes the data limit of a single access key.
	pub async fn remove_access_key_data_limit(&self, key_id: &str) -> Result<(), OutlineError> {
		self.delete(&[routes::ACCESS_KEYS, key_segment(key_id)?, routes::DATA_LIMIT]).await
	}

	/// Fetches cumulative bytes transferred per access key.
	pub async fn get_metrics(&self) -> Result<F::Output<Metrics>, OutlineError> {
		self.get::<Metrics>(&[routes::METRICS, routes::TRANSFER], &[]).await
	}

	/// Fetches server and per-key metrics over the last [`DEFAULT_METRICS_WINDOW`].
	pub async fn get_experimental_metrics(&self) -> Result<F::Output<ExperimentalMetrics>, OutlineError> {
		self.get_experimental_metrics_since(DEFAULT_METRICS_WINDOW).await
	}

	/// Fetches server and per-key metrics over the window `since`, e.g. `24h` or `7d`.
	pub async fn get_experimental_metrics_since(
		&self, since: &str,
	) -> Result<F::Output<ExperimentalMetrics>, OutlineError> {
		if since.is_empty() {
			return Err(ValidationError::single(routes::SINCE, "non-empty string", "\"\"").into());
		}
		let segments = [routes::EXPERIMENTAL, routes::SERVER, routes::METRICS];
		self.get::<ExperimentalMetrics>(&segments, &[(routes::SINCE, since)]).await
	}

	async fn get<T: Record>(
		&self, segments: &[&str], query: &[(&str, &str)],
	) -> Result<F::Output<T>, OutlineError> {
		let payload = self.send(Method::GET, segments, query, None).await?;
		Ok(F::render::<T>(payload)?)
	}

	async fn put<B: Record>(&self, segments: &[&str], request: &B) -> Result<(), OutlineError> {
		let body = schema::encode(request)?;
		self.send(Method::PUT, segments, &[], Some(body)).await.map(|_| ())
	}

	async fn delete(&self, segments: &[&str]) -> Result<(), OutlineError> {
		self.send(Method::DELETE, segments, &[], None).await.map(|_| ())
	}

	async fn send(
		&self, method: Method, segments: &[&str], query: &[(&str, &str)], body: Option<String>,
	) -> Result<String, OutlineError> {
		let url = self.endpoint(segments, query)?;
		// Only the relative path is logged, the base URL carries the API secret.
		let path = segments.join("/");
		tracing::debug!(%method, path = %path, "Sending management API request");

		let mut request = self.client.request(method.clone(), url);
		if let Some(body) = body {
			request = request.header(CONTENT_TYPE, APPLICATION_JSON).body(body);
		}
		let response = request.send().await.map_err(|e| OutlineError::Transport(e.without_url()))?;
		let status = response.status();
		let payload = response.text().await.map_err(|e| OutlineError::Transport(e.without_url()))?;

		if status.is_success() {
			tracing::debug!(%method, path = %path, %status, "Management API request succeeded");
			Ok(payload)
		} else {
			tracing::warn!(%method, path = %path, %status, "Management API request failed");
			Err(OutlineError::Api { status, body: payload })
		}
	}

	fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, OutlineError> {
		let mut url = self.config.api_url().clone();
		url.path_segments_mut()
			.map_err(|_| ConfigError::UnsupportedUrl("url cannot be a base".to_string()))?
			.pop_if_empty()
			.extend(segments);
		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query);
		}
		Ok(url)
	}
}

fn key_segment(key_id: &str) -> Result<&str, ValidationError> {
	if key_id.is_empty() {
		Err(ValidationError::single("id", "non-empty string", "\"\""))
	} else {
		Ok(key_id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn client() -> OutlineClient {
		let config = ClientConfig::unpinned("https://1.2.3.4:1234/SECRET/").unwrap();
		OutlineClient::from_client(config, Client::new())
	}

	#[test]
	fn endpoint_appends_segments_under_secret_path() {
		let url = client().endpoint(&[routes::ACCESS_KEYS, "7", routes::DATA_LIMIT], &[]).unwrap();
		assert_eq!(url.as_str(), "https://1.2.3.4:1234/SECRET/access-keys/7/data-limit");
	}

	#[test]
	fn endpoint_encodes_key_id_as_single_segment() {
		let url = client().endpoint(&[routes::ACCESS_KEYS, "a/b c"], &[]).unwrap();
		assert_eq!(url.path(), "/SECRET/access-keys/a%2Fb%20c");
	}

	#[test]
	fn endpoint_appends_query() {
		let segments = [routes::EXPERIMENTAL, routes::SERVER, routes::METRICS];
		let url = client().endpoint(&segments, &[(routes::SINCE, "30d")]).unwrap();
		assert_eq!(url.as_str(), "https://1.2.3.4:1234/SECRET/experimental/server/metrics?since=30d");
	}

	#[test]
	fn empty_key_id_is_rejected() {
		let err = key_segment("").unwrap_err();
		assert!(err.field("id").is_some());
	}
}
