use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::rbac::Role;

/// Server configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// port: 8080
/// data-dir: /var/lib/lens/registry
/// enable-auth: true
/// enable-rbac: true
/// link-label: app
/// name-labels: [app, k8s-app]
/// tokens:
///   ops-token:
///     operators: true
///     exclusions: [kube-system]
///   team-token:
///     viewers: true
///     matchLabels: ["team=payments*"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigFile {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, alias = "data-dir")]
    pub data_dir: Option<String>,
    /// Seed file for the in-memory store; when set the registry is not opened.
    #[serde(default)]
    pub fixture: Option<String>,
    #[serde(default, alias = "enable-auth")]
    pub enable_auth: Option<bool>,
    #[serde(default, alias = "enable-rbac")]
    pub enable_rbac: Option<bool>,
    /// Bearer token → role granted to its holder.
    #[serde(default)]
    pub tokens: HashMap<String, Role>,
    /// Role used for every request when authentication is disabled.
    #[serde(default, alias = "default-role")]
    pub default_role: Option<Role>,
    #[serde(default, alias = "name-labels")]
    pub name_labels: Option<Vec<String>>,
    #[serde(default, alias = "link-label")]
    pub link_label: Option<String>,
    #[serde(default, alias = "sensitive-env")]
    pub sensitive_env: Option<Vec<String>>,
    #[serde(default, alias = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_case_keys_and_token_roles() {
        let yaml = r#"
port: 9000
enable-rbac: true
link-label: app.kubernetes.io/part-of
tokens:
  abc:
    viewers: true
    matchLabels: ["app=web"]
"#;
        let cfg: ServerConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.port, Some(9000));
        assert_eq!(cfg.enable_rbac, Some(true));
        assert_eq!(cfg.link_label.as_deref(), Some("app.kubernetes.io/part-of"));
        let role = cfg.tokens.get("abc").unwrap();
        assert!(role.viewers);
        assert_eq!(role.match_labels, vec!["app=web".to_string()]);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg: ServerConfigFile = load_config_file("/nonexistent/lens/config.yaml").unwrap();
        assert!(cfg.port.is_none());
        assert!(cfg.tokens.is_empty());
    }
}
