// ABOUTME: Configuration types and parsing for blue-green.yml.
// ABOUTME: Handles discovery, YAML parsing, defaults, and command-line overrides.

mod deserialize;

use crate::error::{Error, Result};
use deserialize::{deserialize_hosts, deserialize_retain};
use serde::Deserialize;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "blue-green.yml";
pub const CONFIG_FILENAME_ALT: &str = "blue-green.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".blue-green/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// cf executable to run, looked up on PATH unless it contains a slash.
    #[serde(default = "default_cf_binary")]
    pub cf_binary: String,

    /// CF_HOME for the cf executable. Inherited from the environment when unset.
    #[serde(default)]
    pub cf_home: Option<PathBuf>,

    /// Archived generations kept after a push. Unset keeps all of them.
    #[serde(default, deserialize_with = "deserialize_retain")]
    pub retain: Option<NonZeroUsize>,

    /// Production host per logical app name. Defaults to the app name.
    #[serde(default, deserialize_with = "deserialize_hosts")]
    pub hosts: HashMap<String, String>,
}

fn default_cf_binary() -> String {
    "cf".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cf_binary: default_cf_binary(),
            cf_home: None,
            retain: None,
            hosts: HashMap::new(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like `discover`, but an absent file yields the defaults.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        retain: Option<NonZeroUsize>,
        cf_binary: Option<String>,
    ) -> Self {
        if retain.is_some() {
            self.retain = retain;
        }
        if let Some(binary) = cf_binary {
            self.cf_binary = binary;
        }
        self
    }
}
