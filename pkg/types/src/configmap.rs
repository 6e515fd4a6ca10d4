use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::meta::{Kind, ObjectMeta, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMap {
    #[serde(flatten)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

impl Resource for ConfigMap {
    const KIND: Kind = Kind::ConfigMap;

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
