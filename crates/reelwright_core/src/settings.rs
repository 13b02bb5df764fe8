//! Admin-controlled settings, injected into the services that need them.

use crate::Capability;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Provider ids an administrator has enabled, per capability.
///
/// Only used to filter the choices shown to users. An empty set for a
/// capability means every provider is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettings {
    /// Enabled provider ids keyed by capability.
    #[serde(default, alias = "enabled_providers")]
    pub enabled_providers: BTreeMap<Capability, BTreeSet<String>>,
}

impl AdminSettings {
    /// Enable a provider for a capability.
    pub fn enable(mut self, capability: Capability, provider: impl Into<String>) -> Self {
        self.enabled_providers
            .entry(capability)
            .or_default()
            .insert(provider.into());
        self
    }

    /// Whether a provider may be offered for a capability.
    pub fn is_enabled(&self, capability: Capability, provider: &str) -> bool {
        match self.enabled_providers.get(&capability) {
            Some(enabled) if !enabled.is_empty() => enabled.contains(provider),
            _ => true,
        }
    }

    /// Filter candidate ids down to the ones users may pick.
    pub fn selectable<'a>(
        &self,
        capability: Capability,
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        candidates
            .into_iter()
            .filter(|p| self.is_enabled(capability, p))
            .map(str::to_string)
            .collect()
    }

    /// Enabled ids for a capability, in sorted order.
    pub fn enabled(&self, capability: Capability) -> Vec<String> {
        self.enabled_providers
            .get(&capability)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}
