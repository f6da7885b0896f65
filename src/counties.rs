//! County registry: profiles loaded from counties.yaml
//!
//! ```yaml
//! counties:
//!   dauphin:
//!     name: Dauphin County
//!     base_url: https://recorder.example.gov
//!     search_path: /Search/SearchResults
//!     data_path: /Search/GridResults
//!     city_filter: ""
//!     doc_types: [DEED]
//!     doc_types_display: Deeds
//! ```

use crate::schema::CountyProfile;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read county file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse county file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Unknown county '{0}' (available: {1})")]
    UnknownCounty(String, String),
    #[error("County '{0}' has no document types configured")]
    NoDocTypes(String),
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    counties: BTreeMap<String, CountyProfile>,
}

/// All configured counties, keyed by id
#[derive(Debug, Clone, Default)]
pub struct CountyRegistry {
    counties: BTreeMap<String, CountyProfile>,
}

impl CountyRegistry {
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let file: RegistryFile = serde_yaml::from_str(content)?;
        let counties = file
            .counties
            .into_iter()
            .map(|(id, mut profile)| {
                profile.id = id.clone();
                profile.base_url = profile.base_url.trim_end_matches('/').to_string();
                dedup_in_order(&mut profile.doc_types);
                (id, profile)
            })
            .collect();
        Ok(Self { counties })
    }

    /// Look up a county by id
    pub fn get(&self, id: &str) -> Result<&CountyProfile, RegistryError> {
        let profile = self.counties.get(id).ok_or_else(|| {
            RegistryError::UnknownCounty(id.to_string(), self.ids().join(", "))
        })?;
        if profile.doc_types.is_empty() {
            return Err(RegistryError::NoDocTypes(id.to_string()));
        }
        Ok(profile)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.counties.keys().map(String::as_str).collect()
    }
}

fn dedup_in_order(codes: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    codes.retain(|code| seen.insert(code.clone()));
}
