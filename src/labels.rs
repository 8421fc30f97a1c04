//! Standard label index consulted when the symbol registry misses.

use crate::registry::Target;
use serde::Deserialize;
use std::collections::HashMap;

/// Generic documentation labels. Names are matched case-insensitively.
pub trait LabelIndex: Send + Sync {
    /// Named labels (section titles, explicit targets).
    fn label(&self, name: &str) -> Option<Target>;
    /// Anonymous labels (any anchor, with or without a title).
    fn anon_label(&self, name: &str) -> Option<Target>;
}

/// In-memory label index, loadable from
/// `{"labels": {name: {page, anchor}}, "anonlabels": {...}}`.
#[derive(Debug, Default, Deserialize)]
pub struct StandardLabels {
    #[serde(default)]
    labels: HashMap<String, Target>,
    #[serde(default)]
    anonlabels: HashMap<String, Target>,
}

impl StandardLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        let raw: StandardLabels = serde_json::from_str(input)?;
        Ok(StandardLabels {
            labels: fold_keys(raw.labels),
            anonlabels: fold_keys(raw.anonlabels),
        })
    }

    pub fn insert_label(&mut self, name: &str, target: Target) {
        self.labels.insert(name.to_lowercase(), target);
    }

    pub fn insert_anon_label(&mut self, name: &str, target: Target) {
        self.anonlabels.insert(name.to_lowercase(), target);
    }
}

fn fold_keys(map: HashMap<String, Target>) -> HashMap<String, Target> {
    map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
}

impl LabelIndex for StandardLabels {
    fn label(&self, name: &str) -> Option<Target> {
        self.labels.get(&name.to_lowercase()).cloned()
    }

    fn anon_label(&self, name: &str) -> Option<Target> {
        self.anonlabels.get(&name.to_lowercase()).cloned()
    }
}
