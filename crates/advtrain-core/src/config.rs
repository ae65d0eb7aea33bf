//! YAML configuration for a training run.
//!
//! ```yaml
//! attacks:
//!   - name: fgsm
//!     params: { eps: 0.1, clip_min: 0.0 }
//!   - name: deepfool
//! fit:
//!   epochs: 5
//! ```
//!
//! Attack names are resolved to instances by the caller; the file only
//! carries names and options.

use crate::attacks::AttackSet;
use crate::error::{TrainerError, TrainerResult};
use crate::model::AttackRef;
use crate::params::Params;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainerConfig {
    #[serde(default)]
    pub attacks: Vec<AttackEntry>,
    /// Training options passed to every classifier `fit`.
    #[serde(default)]
    pub fit: Params,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttackEntry {
    pub name: String,
    #[serde(default)]
    pub params: Params,
}

impl TrainerConfig {
    pub fn from_yaml_str(s: &str) -> TrainerResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> TrainerResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading trainer config");
        let content = std::fs::read_to_string(path).map_err(|source| TrainerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Build the attack set, looking up each configured name with `resolve`.
    pub fn resolve_attacks<F>(&self, mut resolve: F) -> TrainerResult<AttackSet>
    where
        F: FnMut(&str) -> Option<AttackRef>,
    {
        let mut set = AttackSet::new();
        for entry in &self.attacks {
            let attack = resolve(&entry.name).ok_or_else(|| TrainerError::UnknownAttack {
                name: entry.name.clone(),
            })?;
            set.insert(attack, entry.params.clone());
        }
        Ok(set)
    }
}
