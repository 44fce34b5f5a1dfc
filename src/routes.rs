pub(crate) const SERVER: &str = "server";
pub(crate) const NAME: &str = "name";
pub(crate) const HOSTNAME_FOR_ACCESS_KEYS: &str = "hostname-for-access-keys";
pub(crate) const PORT_FOR_NEW_ACCESS_KEYS: &str = "port-for-new-access-keys";
pub(crate) const ACCESS_KEY_DATA_LIMIT: &str = "access-key-data-limit";
pub(crate) const ACCESS_KEYS: &str = "access-keys";
pub(crate) const DATA_LIMIT: &str = "data-limit";
pub(crate) const METRICS: &str = "metrics";
pub(crate) const ENABLED: &str = "enabled";
pub(crate) const TRANSFER: &str = "transfer";
pub(crate) const EXPERIMENTAL: &str = "experimental";
pub(crate) const SINCE: &str = "since";
