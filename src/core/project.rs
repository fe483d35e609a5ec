// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use crate::swarn;

const FALLBACK_PROJECT: &str = "default";

pub const OVERALL_IDLE_TIME_KEY: &str = "OverallIdleTime";
pub const LAST_COMPILE_IDLE_TIME_KEY: &str = "LastCompileIdleTime";
pub const LAST_IDLE_START_TIME_KEY: &str = "LastIdleStartTime";
pub const ACTIVE_KEY: &str = "Active";

/// Decides which project the tallies belong to.
pub trait ProjectResolver: Send {
    fn project_name(&self) -> Option<String>;
}

/// Project name pinned by configuration.
#[derive(Debug, Clone)]
pub struct FixedProject(pub String);

impl ProjectResolver for FixedProject {
    fn project_name(&self) -> Option<String> {
        let name = self.0.trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Takes the second-to-last segment of a data path, e.g.
/// `/Projects/Unity/AwesomeProject/Assets` -> `AwesomeProject`.
///
/// Only correct when the data directory sits directly under the project root.
#[derive(Debug, Clone)]
pub struct DataPathResolver {
    pub data_path: String,
    pub separator: char,
}

impl DataPathResolver {
    pub fn new(data_path: impl Into<String>) -> Self {
        Self {
            data_path: data_path.into(),
            separator: std::path::MAIN_SEPARATOR,
        }
    }

    /// Defaults to `<cwd>/Assets`, so the project is the working directory's name.
    pub fn from_current_dir() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(cwd.join("Assets").to_string_lossy().into_owned())
    }
}

impl ProjectResolver for DataPathResolver {
    fn project_name(&self) -> Option<String> {
        let tokens: Vec<&str> = self.data_path.split(self.separator).collect();
        if tokens.len() < 2 {
            return None;
        }

        let name = tokens[tokens.len() - 2].trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Per-project key names, resolved once when the timer is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefKeys {
    pub project: String,
    pub overall_idle_time: String,
    pub last_compile_idle_time: String,
    pub last_idle_start_time: String,
    pub active: String,
}

impl PrefKeys {
    pub fn for_project(project: &str) -> Self {
        let key = |name: &str| format!("{project}_{name}");
        Self {
            project: project.to_string(),
            overall_idle_time: key(OVERALL_IDLE_TIME_KEY),
            last_compile_idle_time: key(LAST_COMPILE_IDLE_TIME_KEY),
            last_idle_start_time: key(LAST_IDLE_START_TIME_KEY),
            active: key(ACTIVE_KEY),
        }
    }

    pub fn resolve(resolver: &dyn ProjectResolver) -> Self {
        match resolver.project_name() {
            Some(name) => Self::for_project(&name),
            None => {
                swarn!(
                    "Project",
                    "could not derive a project name, falling back to '{}'",
                    FALLBACK_PROJECT
                );
                Self::for_project(FALLBACK_PROJECT)
            }
        }
    }

    /// The keys the clear action removes.
    pub fn idle_keys(&self) -> [&str; 3] {
        [
            self.overall_idle_time.as_str(),
            self.last_idle_start_time.as_str(),
            self.last_compile_idle_time.as_str(),
        ]
    }
}
