use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::{debug, info};
use ucc_types::{Dimension, RoutingTable};

use crate::catalog::{builtin_presets, SecurityPreset};
use crate::error::{Result, SecurityError};
use crate::profile::SecurityProfile;

/// Named security presets. Names are case-insensitive and kept in
/// registration order.
#[derive(Debug, Default)]
pub struct PresetRegistry {
    presets: RwLock<Vec<SecurityPreset>>,
}

impl PresetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `tpn`, `vfx` and `enterprise`.
    pub fn with_builtins() -> Self {
        Self {
            presets: RwLock::new(builtin_presets()),
        }
    }

    pub fn list_presets(&self) -> Vec<String> {
        self.presets.read().iter().map(|p| p.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<SecurityPreset> {
        let key = name.to_lowercase();
        self.presets.read().iter().find(|p| p.name == key).cloned()
    }

    /// Register or replace a preset.
    pub fn register_preset(&self, name: &str, dimensions: Vec<Dimension>, routing: RoutingTable) {
        let preset = SecurityPreset::new(name.to_lowercase(), dimensions, routing);
        let mut presets = self.presets.write();
        match presets.iter().position(|p| p.name == preset.name) {
            Some(index) => presets[index] = preset,
            None => {
                info!(preset = %preset.name, dimensions = preset.dimensions.len(), "Security preset registered");
                presets.push(preset);
            }
        }
    }

    /// Returns whether the preset existed.
    pub fn unregister_preset(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        let mut presets = self.presets.write();
        let before = presets.len();
        presets.retain(|p| p.name != key);
        presets.len() != before
    }

    /// Compose a profile from presets, left to right.
    ///
    /// Fails on the first unknown name, listing the registered ones.
    pub fn security_profile(&self, names: &[&str]) -> Result<SecurityProfile> {
        let mut profile = SecurityProfile::default();
        for name in names {
            let preset = self.get(name).ok_or_else(|| SecurityError::UnknownPreset {
                name: name.to_string(),
                available: self.list_presets(),
            })?;
            profile = profile.merge(&SecurityProfile::from_preset(&preset));
        }
        debug!(presets = ?profile.presets(), dimensions = profile.dimensions().len(), "Composed security profile");
        Ok(profile)
    }
}

lazy_static! {
    static ref GLOBAL_PRESETS: Arc<PresetRegistry> = Arc::new(PresetRegistry::with_builtins());
}

/// Process-wide preset registry, seeded with the built-in packs.
pub fn global_presets() -> Arc<PresetRegistry> {
    Arc::clone(&GLOBAL_PRESETS)
}

/// Compose a profile from the process-wide registry.
pub fn security_profile(names: &[&str]) -> Result<SecurityProfile> {
    GLOBAL_PRESETS.security_profile(names)
}
