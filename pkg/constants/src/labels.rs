//! Label keys used to name and correlate workloads.

/// Label whose value correlates otherwise unrelated objects into one application.
pub const DEFAULT_LINK_LABEL: &str = "app";

/// Ordered list of label keys searched for a human-friendly object name.
pub const DEFAULT_NAME_LABELS: &[&str] = &["app", "k8s-app", "name", "app.kubernetes.io/name"];

/// Label key viewers are matched on when no application name is given.
pub const VIEWER_APP_LABEL: &str = "app";

/// Environment variable names containing any of these substrings are never shown.
pub const DEFAULT_SENSITIVE_ENV: &[&str] = &["password", "passwd", "secret", "token", "key"];
