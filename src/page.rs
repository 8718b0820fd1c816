//! Page composition: the feature table and the navigation built from it.
//!
//! Features carry stable identifiers that double as fragment targets; the
//! navigation links point at them and the annotator never interprets them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A product feature shown as a section of the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Stable identifier that won't change
    pub id: String,
    pub title: String,
    pub description: String,
    /// Poster image
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Optional shorter label for navigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_label: Option<String>,
}

/// A navigation entry jumping to a section of the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

/// Ordered, id-unique list of features.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FeatureCatalog {
    features: Vec<Feature>,
}

impl FeatureCatalog {
    pub fn new(features: Vec<Feature>) -> Result<Self> {
        let mut seen = HashSet::new();
        for f in &features {
            if f.id.trim().is_empty() {
                return Err(Error::Config(format!("feature '{}' has an empty id", f.title)));
            }
            if !seen.insert(f.id.as_str()) {
                return Err(Error::DuplicateId(f.id.clone()));
            }
        }
        Ok(Self { features })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// One link per feature, in page order, using the short label if present.
    pub fn nav_links(&self) -> Vec<NavLink> {
        self.features
            .iter()
            .map(|f| NavLink {
                label: f.nav_label.clone().unwrap_or_else(|| f.title.clone()),
                href: format!("#{}", f.id),
            })
            .collect()
    }

    pub fn anchor_ids(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.id.as_str())
    }
}
