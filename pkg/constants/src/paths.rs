//! Filesystem path constants.

/// Default config file path for the server.
pub const DEFAULT_SERVER_CONFIG: &str = "/etc/lens/config.yaml";

/// Default data directory of the registry the server reads from.
pub const DEFAULT_SERVER_DATA_DIR: &str = "/tmp/lens-data";
