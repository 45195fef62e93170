//! `dinesearch.toml` configuration.
//!
//! ```toml
//! [parser]
//! match_policy = "last_wins"   # or "first_wins"
//!
//! [fields]
//! name = "name"
//! city = "city"
//!
//! [data]
//! path = "${DINESEARCH_DATA}"
//! ```
//!
//! Every section is optional. Lookup order: `$DINESEARCH_CONFIG`, then the nearest
//! `dinesearch.toml` in the current directory or its ancestors, then defaults.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    errors::SearchError,
    parser::{MatchPolicy, QueryParser},
    search::{FieldMap, QueryBuilder},
};

pub const CONFIG_FILE_NAME: &str = "dinesearch.toml";
pub const CONFIG_ENV_VAR: &str = "DINESEARCH_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub parser: ParserSettings,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default)]
    pub data: DataSettings,
    /// File the configuration was loaded from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserSettings {
    #[serde(default)]
    pub match_policy: MatchPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_data_path")]
    pub path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> String {
    "${DINESEARCH_DATA}".to_string()
}

impl DataSettings {
    /// The dataset path, expanding a whole-value `${VAR}` placeholder.
    pub fn resolve_path(&self) -> Result<PathBuf, SearchError> {
        let raw = self.path.trim();
        if let Some(name) = raw.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
            let value = std::env::var(name).map_err(|_| SearchError::MissingEnv {
                name: name.to_string(),
            })?;
            Ok(PathBuf::from(value))
        } else {
            Ok(PathBuf::from(raw))
        }
    }
}

impl SearchConfig {
    /// Load and validate a specific file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| SearchError::io(path, err))?;
        let mut config: SearchConfig = toml::from_str(&content)?;
        config.fields.validate()?;
        config.source = Some(path.to_path_buf());
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the nearest `dinesearch.toml` at or above `start`, or defaults if none exists.
    pub fn find_from(start: &Path) -> Result<Self, SearchError> {
        match find_config_file(start) {
            Some(path) => Self::load(path),
            None => {
                debug!("no {CONFIG_FILE_NAME} found from {}, using defaults", start.display());
                Ok(Self::default())
            }
        }
    }

    /// `$DINESEARCH_CONFIG` if set, otherwise search from the current directory.
    pub fn discover() -> Result<Self, SearchError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.trim().is_empty()
        {
            return Self::load(path.trim());
        }
        let current_dir = std::env::current_dir().map_err(|err| SearchError::io(".", err))?;
        Self::find_from(&current_dir)
    }

    #[inline]
    pub fn parser(&self) -> QueryParser {
        QueryParser::new(self.parser.match_policy)
    }

    #[inline]
    pub fn builder(&self) -> QueryBuilder {
        QueryBuilder::with_fields(self.fields.clone())
    }
}

fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
