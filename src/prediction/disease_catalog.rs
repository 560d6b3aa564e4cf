use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

const DEFAULT_DESCRIPTIONS: [(&str, &str); 5] = [
    ("Cf_blk_rot", "Cauliflower Black Rot Disease"),
    ("Cf_healthy_l", "Healthy Cauliflower Leaf"),
    ("Cf_healthy_v", "Healthy Cauliflower Vegetable"),
    ("Cf_r_spot", "Cauliflower Ring Spot Disease"),
    ("Cf_s_rot", "Cauliflower Soft Rot Disease"),
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not open the disease catalog file.")]
    Io(#[from] std::io::Error),
    #[error("The disease catalog file is not a JSON object of class name to description.")]
    Parse(#[from] serde_json::Error),
}

/// Maps raw model class names to human-readable disease descriptions.
///
/// The catalog is fixed at construction. Class names it does not know pass
/// through unchanged, so a model retrained with extra classes keeps working
/// before the catalog catches up.
#[derive(Clone, Debug)]
pub struct DiseaseCatalog {
    descriptions: HashMap<String, String>,
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        DiseaseCatalog {
            descriptions: DEFAULT_DESCRIPTIONS
                .iter()
                .map(|(name, description)| (name.to_string(), description.to_string()))
                .collect(),
        }
    }
}

impl DiseaseCatalog {
    /// Reads a catalog from a json file holding one object of raw class name
    /// to description.
    pub fn from_json_file(filepath: &Path) -> Result<Self, CatalogError> {
        let reader = BufReader::new(File::open(filepath)?);
        let descriptions: HashMap<String, String> = serde_json::from_reader(reader)?;
        Ok(DiseaseCatalog { descriptions })
    }

    /// The description for `raw_class`, or `raw_class` itself when the
    /// catalog has no entry for it.
    pub fn label_for(&self, raw_class: &str) -> String {
        self.descriptions
            .get(raw_class)
            .cloned()
            .unwrap_or_else(|| raw_class.to_string())
    }
}
