//! Chapter configuration for the scroll-driven narrative.
//!
//! Each chapter declares the set of layers it wants visible and at what
//! opacity. Configs deserialize from the narrative's JSON configuration
//! documents.

use serde::{Deserialize, Serialize};

/// One layer a chapter wants visible, at a target opacity in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterLayer {
    pub id: String,
    pub opacity: f64,
}

impl ChapterLayer {
    pub fn new(id: impl Into<String>, opacity: f64) -> Self {
        Self {
            id: id.into(),
            opacity,
        }
    }
}

/// Desired visible layer set for one narrative step.
///
/// Layer ids are expected to be unique; order is preserved and determines the
/// order in which fade-in requests are issued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterConfig {
    #[serde(default)]
    pub layers: Vec<ChapterLayer>,
}

impl ChapterConfig {
    pub fn new(layers: Vec<ChapterLayer>) -> Self {
        Self { layers }
    }

    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("Invalid chapter config: {}", e))
    }

    pub fn layer_ids(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|layer| layer.id.as_str())
    }
}
