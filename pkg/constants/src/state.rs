//! Registry key layout constants.

/// Root prefix of every cluster object in the registry.
pub const REGISTRY_PREFIX: &str = "/registry";

/// Prefix of namespace objects (`/registry/namespaces/<name>`).
pub const NAMESPACES_PREFIX: &str = "/registry/namespaces/";

/// Root prefix of captured pod logs (`/logs/<ns>/<pod>/<container>`).
pub const LOGS_PREFIX: &str = "/logs";

/// Field selector key matching an object's name.
pub const FIELD_METADATA_NAME: &str = "metadata.name";

/// Field selector key matching an object's namespace.
pub const FIELD_METADATA_NAMESPACE: &str = "metadata.namespace";
