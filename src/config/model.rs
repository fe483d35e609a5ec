// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use rune_cfg::RuneConfig;

use crate::core::project::{DataPathResolver, FixedProject, ProjectResolver};
use crate::core::store::default_store_path;
use crate::idle_log::LogPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct IdleTallyConfig {
    pub project: Option<String>,
    pub data_path: Option<String>,
    pub store_path: PathBuf,
    pub log_policy: LogPolicy,
}

impl Default for IdleTallyConfig {
    fn default() -> Self {
        Self {
            project: None,
            data_path: None,
            store_path: default_store_path(),
            log_policy: LogPolicy::default(),
        }
    }
}

impl IdleTallyConfig {
    pub fn from_rune(config: &RuneConfig) -> Self {
        let defaults = Self::default();

        let project = config
            .get::<String>("idletally.project")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let data_path = config
            .get::<String>("idletally.data_path")
            .or_else(|_| config.get::<String>("idletally.data-path"))
            .ok()
            .filter(|s| !s.trim().is_empty());

        let store_path = config
            .get::<String>("idletally.store_path")
            .or_else(|_| config.get::<String>("idletally.store-path"))
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        let max_bytes = config
            .get::<u64>("idletally.log_max_bytes")
            .or_else(|_| config.get::<u64>("idletally.log-max-bytes"))
            .unwrap_or(defaults.log_policy.max_bytes);

        let keep_backups = config
            .get::<u64>("idletally.log_backups")
            .or_else(|_| config.get::<u64>("idletally.log-backups"))
            .ok()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(defaults.log_policy.keep_backups);

        Self {
            project,
            data_path,
            store_path,
            log_policy: LogPolicy { max_bytes, keep_backups },
        }
    }

    /// A pinned project name wins over the data-path heuristic.
    pub fn project_resolver(&self) -> Box<dyn ProjectResolver> {
        if let Some(name) = &self.project {
            return Box::new(FixedProject(name.clone()));
        }

        match &self.data_path {
            Some(path) => Box::new(DataPathResolver::new(path.clone())),
            None => Box::new(DataPathResolver::from_current_dir()),
        }
    }
}
