//! Educational content for the biomarker detail view
//!
//! Content is looked up by normalized biomarker identifier. Identifiers with
//! no entry of their own get the generic default entry.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::info;

use crate::entities::analytics::BiomarkerEducation;
use crate::services::biomarker::normalize_identifier;

/// Key in a catalog file that replaces the default entry
pub const DEFAULT_ENTRY_KEY: &str = "default";

/// Errors loading a catalog file
#[derive(Debug, Error)]
pub enum EducationCatalogError {
    #[error("Failed to read education catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse education catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

static SEED_ENTRY: Lazy<BiomarkerEducation> = Lazy::new(|| BiomarkerEducation {
    description: "This biomarker is measured in a routine blood panel and helps describe how \
                  well the related body systems are working."
        .to_string(),
    why_it_matters: "Values outside the reference range can point to nutritional, metabolic or \
                     lifestyle factors that are worth discussing with your healthcare provider."
        .to_string(),
    causes: strings(&[
        "Diet and nutrition",
        "Physical activity level",
        "Sleep quality",
        "Stress",
        "Medications",
        "Underlying health conditions",
    ]),
    foods_to_eat: strings(&["Leafy greens", "Lean proteins", "Whole grains", "Fresh fruits"]),
    foods_to_limit: strings(&["Processed foods", "Added sugars", "Excess alcohol"]),
    supplements: strings(&["Discuss any supplement with your healthcare provider first"]),
    symptoms: strings(&["Fatigue", "Changes in energy levels", "Changes in mood or sleep"]),
    additional_tests: strings(&["Repeat measurement in 3 to 6 months", "Comprehensive metabolic panel"]),
    sources: strings(&["MedlinePlus: Understanding Lab Values", "Lab Tests Online"]),
});

/// Lookup table of educational content keyed by normalized biomarker identifier
#[derive(Debug, Clone)]
pub struct EducationCatalog {
    entries: HashMap<String, BiomarkerEducation>,
    default_entry: BiomarkerEducation,
}

impl Default for EducationCatalog {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            default_entry: SEED_ENTRY.clone(),
        }
    }
}

impl EducationCatalog {
    /// Add or replace the entry for `identifier`
    pub fn with_entry(mut self, identifier: &str, education: BiomarkerEducation) -> Self {
        self.entries.insert(normalize_identifier(identifier), education);
        self
    }

    /// Load a catalog from a JSON object mapping identifiers to content.
    ///
    /// A `"default"` key replaces the seed default entry.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EducationCatalogError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let raw: HashMap<String, BiomarkerEducation> = serde_json::from_slice(&bytes)?;

        let mut catalog = Self::default();
        for (identifier, education) in raw {
            if normalize_identifier(&identifier) == DEFAULT_ENTRY_KEY {
                catalog.default_entry = education;
            } else {
                catalog = catalog.with_entry(&identifier, education);
            }
        }

        info!(
            "Loaded education catalog from {} with {} entries",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Content for a biomarker title, falling back to the default entry
    pub fn lookup(&self, title: &str) -> &BiomarkerEducation {
        self.entries
            .get(&normalize_identifier(title))
            .unwrap_or(&self.default_entry)
    }

    /// Number of biomarker-specific entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
