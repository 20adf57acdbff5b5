//! Configuration loaded from defaults, an optional TOML file and
//! `REGFORM_` environment variables (later sources win).
//!
//! ```toml
//! locale = "ru"
//!
//! [store]
//! base_url = "http://localhost:3001"
//! page_size = 10
//!
//! [view]
//! narrow_breakpoint = 100
//!
//! [[fields]]
//! key = "age"
//! title = "Age"
//! kind = { type = "number", required = true, min = 18, max = 100 }
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::locale::Locale;
use crate::schema::{FieldDescriptor, FieldSet};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Terminal columns below which the listing switches to cards.
pub const DEFAULT_TERMINAL_BREAKPOINT: u32 = 100;

const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "REGFORM_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: Locale,
    pub store: StoreConfig,
    pub view: ViewConfig,
    /// Replaces the default registration fields when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDescriptor>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub narrow_breakpoint: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            narrow_breakpoint: DEFAULT_TERMINAL_BREAKPOINT,
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "regform", "regform")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl Config {
    /// Load from `path`, or from the platform config directory when `None`.
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(file) => {
                tracing::debug!("Reading configuration from {}", file.display());
                figment = figment.merge(Toml::file(file));
            }
            None => tracing::debug!("No config directory; using defaults"),
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.base_url.trim().is_empty() {
            return Err(AppError::Config("store.base_url must not be empty".into()));
        }
        if self.store.page_size == 0 {
            return Err(AppError::Config("store.page_size must be at least 1".into()));
        }
        if self.view.narrow_breakpoint == 0 {
            return Err(AppError::Config(
                "view.narrow_breakpoint must be at least 1".into(),
            ));
        }
        if let Some(fields) = &self.fields
            && fields.is_empty()
        {
            return Err(AppError::Config("fields must not be an empty list".into()));
        }
        Ok(())
    }

    /// The descriptor set the form and listing use.
    pub fn field_set(&self) -> Result<FieldSet> {
        match &self.fields {
            Some(fields) => FieldSet::new(fields.clone()),
            None => Ok(FieldSet::defaults(self.locale)),
        }
    }
}
