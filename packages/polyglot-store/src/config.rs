//! Declarative locale configuration. A [`LocaleConfig`] is the static-file
//! counterpart of the add-on's runtime registry and implements
//! [`LocaleRegistry`] directly, so embedders can drive schema builds from a
//! YAML file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::LocaleRegistry;
use crate::types::Locale;
use crate::StoreResult;

/// One configured locale. The code must be a valid GraphQL enum value name
/// (underscored region codes such as `en_US` qualify).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleEntry {
    pub code: String,
    /// Human-readable native name; informational only.
    #[serde(default)]
    pub name: String,
}

/// Locale registry configuration.
///
/// ```yaml
/// default_locale: en_US
/// locales:
///   - code: en_US
///     name: English (United States)
///   - code: fr_FR
///     name: Français
/// localizable:
///   - post
///   - page
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(default)]
    pub default_locale: Option<String>,
    #[serde(default)]
    pub locales: Vec<LocaleEntry>,
    #[serde(default)]
    pub localizable: Vec<String>,
}

impl LocaleConfig {
    pub fn from_yaml(content: &str) -> StoreResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        debug!(
            locales = config.locales.len(),
            localizable = config.localizable.len(),
            "loaded locale configuration"
        );
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }
}

impl LocaleRegistry for LocaleConfig {
    fn default_locale(&self) -> Option<Locale> {
        self.default_locale
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(Locale::new)
    }

    fn available_locales(&self) -> Vec<Locale> {
        self.locales
            .iter()
            .map(|entry| Locale::new(entry.code.as_str()))
            .collect()
    }

    fn localizable_content_types(&self) -> Vec<String> {
        self.localizable.clone()
    }
}
