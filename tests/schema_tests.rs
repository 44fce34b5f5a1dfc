#[cfg(test)]
mod schema_tests {
	use outline_client::schema::{decode, encode, validate};
	use outline_client::types::{AccessKey, DataLimit, DataLimitRequest, Metrics, ServerInfo};
	use serde_json::json;

	#[test]
	fn test_server_info_round_trip() {
		let raw = json!({
			"name": "Test Server",
			"serverId": "server-id",
			"metricsEnabled": false,
			"createdTimestampMs": 1609459200000u64,
			"portForNewAccessKeys": 12345,
			"hostnameForAccessKeys": "1.2.3.4",
			"accessKeyDataLimit": { "bytes": 0 }
		});
		let first: ServerInfo = validate(raw).unwrap();
		let second: ServerInfo = decode(&encode(&first).unwrap()).unwrap();
		assert_eq!(first, second);
		assert_eq!(second.version, None);
	}

	#[test]
	fn test_server_info_negative_timestamp() {
		let err = validate::<ServerInfo>(json!({
			"name": "Test Server",
			"serverId": "server-id",
			"metricsEnabled": true,
			"createdTimestampMs": -1609459200000i64,
			"portForNewAccessKeys": 12345
		}))
		.unwrap_err();
		assert_eq!(err.violations().len(), 1);
		assert_eq!(err.violations()[0].path, "createdTimestampMs");
		assert_eq!(err.violations()[0].actual, "-1609459200000");
	}

	#[test]
	fn test_access_key_constraints() {
		let err = validate::<AccessKey>(json!({
			"id": "",
			"name": "test-key",
			"password": "",
			"port": 70000,
			"method": "aes-256-cfb",
			"accessUrl": ""
		}))
		.unwrap_err();
		let paths: Vec<&str> = err.violations().iter().map(|v| v.path.as_str()).collect();
		assert_eq!(paths, vec!["id", "password", "port", "accessUrl"]);
	}

	#[test]
	fn test_access_key_wrong_types() {
		let err = validate::<AccessKey>(json!({
			"id": 1,
			"name": null,
			"password": "p",
			"port": "8080",
			"method": "m",
			"accessUrl": "ss://x",
			"dataLimit": { "bytes": "lots" }
		}))
		.unwrap_err();
		let paths: Vec<&str> = err.violations().iter().map(|v| v.path.as_str()).collect();
		assert_eq!(paths, vec!["id", "name", "port", "dataLimit.bytes"]);
		assert_eq!(err.field("port").unwrap().expected, "integer in 1..=65535");
	}

	#[test]
	fn test_negative_data_limit() {
		let err = validate::<DataLimit>(json!({ "bytes": -1 })).unwrap_err();
		assert_eq!(err.field("bytes").unwrap().expected, "integer >= 0");
		assert!(DataLimit::try_from(-1i64).is_err());
	}

	#[test]
	fn test_data_limit_request_shape() {
		let body = encode(&DataLimitRequest { limit: DataLimit::new(1_000_000) }).unwrap();
		assert_eq!(body, r#"{"limit":{"bytes":1000000}}"#);
	}

	#[test]
	fn test_metrics_empty_is_valid() {
		let metrics: Metrics = validate(json!({ "bytesTransferredByUserId": {} })).unwrap();
		assert!(metrics.bytes_transferred_by_user_id.is_empty());
	}

	#[test]
	fn test_error_message_names_every_field() {
		let err = validate::<ServerInfo>(json!({})).unwrap_err();
		let message = err.to_string();
		assert!(message.starts_with("5 invalid field(s): "));
		for field in ["name", "serverId", "metricsEnabled", "createdTimestampMs", "portForNewAccessKeys"] {
			assert!(message.contains(field), "{} not in {}", field, message);
		}
	}
}
