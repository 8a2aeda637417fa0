//! Mount-time configuration of a globe, usually read from JSON.

use std::fs;
use std::path::Path;

use layers::{Layer, LayerError, LayerOptions, LayerSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GlobeError;
use crate::projection::ProjectionSpec;

/// One configured layer.
///
/// In JSON this is a catalog type key, a catalog index, or an object
/// `{ "layer": <key or index>, "options": { ... } }`. Any other JSON value
/// parses as [`LayerEntry::Invalid`] and is rejected when the layer is added,
/// so one bad entry does not void the whole config.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LayerEntry {
    Index(usize),
    Type(String),
    Configured {
        layer: Value,
        #[serde(default)]
        options: LayerOptions,
    },
    Invalid(Value),
    /// A layer built in code. Not expressible in JSON.
    #[serde(skip)]
    Prebuilt(Layer),
}

impl LayerEntry {
    pub fn into_parts(self) -> Result<(LayerSource, LayerOptions), LayerError> {
        match self {
            LayerEntry::Index(index) => Ok((LayerSource::Index(index), LayerOptions::default())),
            LayerEntry::Type(key) => Ok((LayerSource::Type(key), LayerOptions::default())),
            LayerEntry::Prebuilt(layer) => Ok((LayerSource::Layer(layer), LayerOptions::default())),
            LayerEntry::Configured { layer, options } => {
                let source = match layer {
                    Value::String(key) => LayerSource::Type(key),
                    Value::Number(n) => {
                        match n.as_u64().and_then(|index| usize::try_from(index).ok()) {
                            Some(index) => LayerSource::Index(index),
                            None => {
                                return Err(LayerError::InvalidLayerArgument(format!(
                                    "layer index {n} is not a valid catalog position"
                                )));
                            }
                        }
                    }
                    other => {
                        return Err(LayerError::InvalidLayerArgument(format!(
                            "expected a layer type or index, got {other}"
                        )));
                    }
                };
                Ok((source, options))
            }
            LayerEntry::Invalid(value) => Err(LayerError::InvalidLayerArgument(format!(
                "expected a layer type, index or {{layer, options}} object, got {value}"
            ))),
        }
    }
}

impl From<&str> for LayerEntry {
    fn from(key: &str) -> Self {
        LayerEntry::Type(key.to_string())
    }
}

impl From<usize> for LayerEntry {
    fn from(index: usize) -> Self {
        LayerEntry::Index(index)
    }
}

impl From<Layer> for LayerEntry {
    fn from(layer: Layer) -> Self {
        LayerEntry::Prebuilt(layer)
    }
}

/// Camera coordinates a host can change after mount.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobeProps {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Eye distance in meters.
    pub altitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobeConfig {
    /// Existing canvas to attach to; a `canvas_<ms>` id is generated when absent.
    #[serde(default)]
    pub canvas_id: Option<String>,
    #[serde(default)]
    pub layers: Vec<LayerEntry>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub projection: Option<ProjectionSpec>,
    /// Prefix for the catalog's bundled image paths; the public WorldWind
    /// artifact server when absent.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl GlobeConfig {
    pub fn from_json_str(text: &str) -> Result<Self, GlobeError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GlobeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GlobeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn props(&self) -> GlobeProps {
        GlobeProps {
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
        }
    }

    pub fn with_layer(mut self, entry: impl Into<LayerEntry>) -> Self {
        self.layers.push(entry.into());
        self
    }
}
