//! Symbol registry: documented names and the page anchors defining them.
//!
//! Filled while definitions are processed and read while any page renders,
//! possibly from several threads. Writes take an exclusive lock; reads share
//! it. A name that has not been registered yet is simply a miss.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Prefix of the anchor ids emitted for type definitions.
pub const TYPE_ANCHOR_PREFIX: &str = "tsref-type-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Type,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Type => "type",
        }
    }
}

/// A link destination: page identifier plus in-page anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub page: String,
    pub anchor: String,
}

impl Target {
    pub fn new(page: impl Into<String>, anchor: impl Into<String>) -> Self {
        Target {
            page: page.into(),
            anchor: anchor.into(),
        }
    }
}

/// Anchor id for a documented type.
pub fn type_anchor(name: &str) -> String {
    format!("{TYPE_ANCHOR_PREFIX}{name}")
}

#[derive(Debug, Default)]
pub struct SymbolRegistry {
    objects: RwLock<HashMap<SymbolKind, HashMap<String, Target>>>,
}

/// On-disk form of the registry: `{"types": {"Name": {"page", "anchor"}}}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SymbolDump {
    #[serde(default)]
    pub types: BTreeMap<String, Target>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`, replacing any earlier entry. Returns the replaced
    /// target so callers can report the duplicate.
    pub fn register(
        &self,
        kind: SymbolKind,
        name: &str,
        page: &str,
        anchor: &str,
    ) -> Option<Target> {
        tracing::debug!(kind = kind.as_str(), name, page, anchor, "register symbol");
        self.objects
            .write()
            .entry(kind)
            .or_default()
            .insert(name.to_string(), Target::new(page, anchor))
    }

    /// Register a documented type under its standard anchor.
    pub fn register_type(&self, name: &str, page: &str) -> Option<Target> {
        self.register(SymbolKind::Type, name, page, &type_anchor(name))
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, kind: SymbolKind, name: &str) -> Option<Target> {
        self.objects
            .read()
            .get(&kind)
            .and_then(|names| names.get(name))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all registered types, sorted by name.
    pub fn dump(&self) -> SymbolDump {
        let types = self
            .objects
            .read()
            .get(&SymbolKind::Type)
            .map(|names| names.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        SymbolDump { types }
    }

    pub fn from_dump(dump: SymbolDump) -> Self {
        let registry = SymbolRegistry::new();
        for (name, target) in dump.types {
            registry.register(SymbolKind::Type, &name, &target.page, &target.anchor);
        }
        registry
    }
}
