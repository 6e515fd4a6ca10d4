use serde::{Deserialize, Serialize};

// --- Role ---

/// What an identity may see. Built once per request from the identity's
/// claims and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Viewers see applications whose labels match `match_labels`.
    #[serde(default)]
    pub viewers: bool,
    /// Operators see everything that is not excluded.
    #[serde(default)]
    pub operators: bool,
    /// Ordered allow-list of `key=value` (or `key=prefix*`) rules.
    #[serde(default, alias = "matchLabels", alias = "match-labels")]
    pub match_labels: Vec<String>,
    /// Substring deny-list applied to label keys, label values and namespaces.
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl Role {
    pub fn viewer<I, S>(match_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            viewers: true,
            match_labels: match_labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn operator() -> Self {
        Self {
            operators: true,
            ..Self::default()
        }
    }

    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = exclusions.into_iter().map(Into::into).collect();
        self
    }
}
