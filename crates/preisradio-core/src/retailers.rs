use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Display name used for retailer ids missing from the directory.
pub const UNKNOWN_RETAILER_NAME: &str = "Händler";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerInfo {
    pub id: String,
    pub name: String,
    /// Site-relative logo path, e.g. `/retailers/saturn.png`.
    #[serde(default)]
    pub logo: Option<String>,
    /// Retailer home page. `None` for unknown retailers.
    #[serde(default)]
    pub website: Option<String>,
}

impl RetailerInfo {
    fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: UNKNOWN_RETAILER_NAME.to_string(),
            logo: None,
            website: None,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        self.website.is_some()
    }
}

/// Resolves retailer ids to display data.
///
/// Generators take this as a parameter so tests and deployments can supply
/// their own table.
pub trait RetailerLookup: Send + Sync {
    /// Info for `id`. Unknown ids yield the placeholder name and no website.
    fn retailer_info(&self, id: &str) -> RetailerInfo;

    /// Ids of every retailer in the directory, in declaration order.
    fn retailer_ids(&self) -> Vec<String>;
}

/// Retailer directory backed by an in-memory table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetailerDirectory {
    pub retailers: Vec<RetailerInfo>,
}

impl RetailerDirectory {
    /// Saturn, MediaMarkt, Otto and Kaufland.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |id: &str, name: &str, website: &str| RetailerInfo {
            id: id.to_string(),
            name: name.to_string(),
            logo: Some(format!("/retailers/{id}.png")),
            website: Some(website.to_string()),
        };
        Self {
            retailers: vec![
                entry("saturn", "Saturn", "https://www.saturn.de"),
                entry("mediamarkt", "MediaMarkt", "https://www.mediamarkt.de"),
                entry("otto", "Otto", "https://www.otto.de"),
                entry("kaufland", "Kaufland", "https://www.kaufland.de"),
            ],
        }
    }

    /// Load the directory from `path` when given, else use [`Self::builtin`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => load_retailers(path),
            None => Ok(Self::builtin()),
        }
    }
}

impl RetailerLookup for RetailerDirectory {
    fn retailer_info(&self, id: &str) -> RetailerInfo {
        let key = id.trim().to_lowercase();
        self.retailers
            .iter()
            .find(|r| r.id == key)
            .cloned()
            .unwrap_or_else(|| RetailerInfo::unknown(id))
    }

    fn retailer_ids(&self) -> Vec<String> {
        self.retailers.iter().map(|r| r.id.clone()).collect()
    }
}

/// Load and validate a retailer directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_retailers(path: &Path) -> Result<RetailerDirectory, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RetailersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_retailers(&content)
}

fn parse_retailers(content: &str) -> Result<RetailerDirectory, ConfigError> {
    let mut directory: RetailerDirectory =
        serde_yaml::from_str(content).map_err(ConfigError::RetailersFileParse)?;

    for retailer in &mut directory.retailers {
        retailer.id = retailer.id.trim().to_lowercase();
    }
    validate_retailers(&directory)?;

    Ok(directory)
}

fn validate_retailers(directory: &RetailerDirectory) -> Result<(), ConfigError> {
    if directory.retailers.is_empty() {
        return Err(ConfigError::Validation(
            "at least one retailer is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for retailer in &directory.retailers {
        if retailer.id.is_empty() || retailer.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "retailer id and name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(retailer.id.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate retailer id: '{}'",
                retailer.id
            )));
        }
        if let Some(website) = retailer.website.as_deref() {
            if !website.starts_with("https://") && !website.starts_with("http://") {
                return Err(ConfigError::Validation(format!(
                    "retailer '{}' has invalid website '{website}'",
                    retailer.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "retailers_test.rs"]
mod tests;
