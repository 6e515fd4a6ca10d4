use serde::{Deserialize, Serialize};

use crate::meta::{Kind, ObjectMeta, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(flatten)]
    pub metadata: ObjectMeta,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::new(name, ""),
        }
    }
}

impl Resource for Namespace {
    const KIND: Kind = Kind::Namespace;

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
