use anyhow::{Result, bail};
use pkg_constants::state::{FIELD_METADATA_NAME, FIELD_METADATA_NAMESPACE};
use pkg_types::{Labels, ObjectMeta};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Equals,
    NotEquals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Requirement {
    key: String,
    op: Op,
    value: String,
}

impl Requirement {
    fn parse(raw: &str) -> Result<Self> {
        let (key, op, value) = if let Some((k, v)) = raw.split_once("!=") {
            (k, Op::NotEquals, v)
        } else if let Some((k, v)) = raw.split_once("==") {
            (k, Op::Equals, v)
        } else if let Some((k, v)) = raw.split_once('=') {
            (k, Op::Equals, v)
        } else {
            bail!("invalid selector requirement '{}'", raw);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("selector requirement '{}' has an empty key", raw);
        }
        Ok(Self {
            key: key.to_string(),
            op,
            value: value.trim().to_string(),
        })
    }

    fn accepts(&self, actual: Option<&str>) -> bool {
        match self.op {
            Op::Equals => actual == Some(self.value.as_str()),
            Op::NotEquals => actual != Some(self.value.as_str()),
        }
    }
}

fn parse_requirements(raw: &str) -> Result<Vec<Requirement>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Requirement::parse)
        .collect()
}

/// Equality-based label selector: `app=web,tier!=cache`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            requirements: parse_requirements(raw)?,
        })
    }

    pub fn matches(&self, labels: &Labels) -> bool {
        self.requirements
            .iter()
            .all(|r| r.accepts(labels.get(&r.key).map(String::as_str)))
    }
}

/// Field selector over object metadata: `metadata.name=web`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    requirements: Vec<Requirement>,
}

impl FieldSelector {
    pub fn parse(raw: &str) -> Result<Self> {
        let requirements = parse_requirements(raw)?;
        for r in &requirements {
            if r.key != FIELD_METADATA_NAME && r.key != FIELD_METADATA_NAMESPACE {
                bail!("unsupported field selector '{}'", r.key);
            }
        }
        Ok(Self { requirements })
    }

    /// Selector matching a single object by name.
    pub fn name(name: &str) -> Self {
        Self {
            requirements: vec![Requirement {
                key: FIELD_METADATA_NAME.to_string(),
                op: Op::Equals,
                value: name.to_string(),
            }],
        }
    }

    pub fn matches(&self, meta: &ObjectMeta) -> bool {
        self.requirements.iter().all(|r| {
            let actual = if r.key == FIELD_METADATA_NAME {
                meta.name.as_str()
            } else {
                meta.namespace.as_str()
            };
            r.accepts(Some(actual))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn label_selector_requires_every_term() {
        let sel = LabelSelector::parse("app=web, tier!=cache").unwrap();
        assert!(sel.matches(&labels(&[("app", "web"), ("tier", "api")])));
        assert!(sel.matches(&labels(&[("app", "web")])));
        assert!(!sel.matches(&labels(&[("app", "web"), ("tier", "cache")])));
        assert!(!sel.matches(&labels(&[("app", "api")])));
    }

    #[test]
    fn empty_selector_matches_everything() {
        let sel = LabelSelector::parse("").unwrap();
        assert!(sel.matches(&Labels::new()));
    }

    #[test]
    fn malformed_selector_is_rejected() {
        assert!(LabelSelector::parse("app").is_err());
        assert!(LabelSelector::parse("=web").is_err());
        assert!(FieldSelector::parse("spec.nodeName=a").is_err());
    }

    #[test]
    fn field_selector_matches_name_and_namespace() {
        let meta = ObjectMeta::new("web", "prod");
        assert!(FieldSelector::name("web").matches(&meta));
        assert!(!FieldSelector::name("api").matches(&meta));
        let sel = FieldSelector::parse("metadata.namespace=prod,metadata.name==web").unwrap();
        assert!(sel.matches(&meta));
    }
}
