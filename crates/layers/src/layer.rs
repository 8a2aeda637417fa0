use std::collections::BTreeMap;

use foundation::LayerId;
use scene::{Renderable, SurfaceLayer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::Category;
use crate::error::LayerError;

/// A named, toggleable drawable composited onto the globe.
///
/// `unique_id`, `category` and `enabled` are owned by the registry once the
/// layer is attached; before that they can be preset with the `with_*`
/// builders.
#[derive(Debug, Clone)]
pub struct Layer {
    id: Option<LayerId>,
    pub display_name: String,
    category: Option<Category>,
    enabled: bool,
    pub opacity: f64,
    pub min_active_altitude: f64,
    pub max_active_altitude: f64,
    pub pick_enabled: bool,
    pub renderable: Renderable,
}

impl Layer {
    pub fn new(display_name: impl Into<String>, renderable: Renderable) -> Self {
        Self {
            id: None,
            display_name: display_name.into(),
            category: None,
            enabled: true,
            opacity: 1.0,
            min_active_altitude: 0.0,
            max_active_altitude: f64::MAX,
            pick_enabled: true,
            renderable,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// `None` until the layer is attached by a registry.
    pub fn unique_id(&self) -> Option<LayerId> {
        self.id
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_attached(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn assign(&mut self, id: LayerId, category: Category) {
        self.id = Some(id);
        self.category = Some(category);
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn surface_layer(&self, id: LayerId) -> SurfaceLayer {
        SurfaceLayer {
            id,
            display_name: self.display_name.clone(),
            enabled: self.enabled,
            opacity: self.opacity,
            min_active_altitude: self.min_active_altitude,
            max_active_altitude: self.max_active_altitude,
            pick_enabled: self.pick_enabled,
            renderable: self.renderable.clone(),
        }
    }
}

/// Property overrides applied to a layer when it is added.
///
/// Every field that is set replaces the layer's value; there is no merging.
/// Keys without a dedicated field land in the renderable's property bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Category key or label fragment, resolved when applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_active_altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_active_altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_enabled: Option<bool>,
    #[serde(flatten)]
    pub properties: BTreeMap<String, Value>,
}

impl LayerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn min_active_altitude(mut self, meters: f64) -> Self {
        self.min_active_altitude = Some(meters);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Writes every set option onto `layer`.
    ///
    /// Fails with [`LayerError::UnknownCategory`] when the category name does
    /// not resolve; the layer may already be partially updated in that case.
    pub fn apply_to(&self, layer: &mut Layer) -> Result<(), LayerError> {
        if let Some(name) = &self.display_name {
            layer.display_name = name.clone();
        }
        if let Some(category) = &self.category {
            layer.category = Some(Category::resolve(category)?);
        }
        if let Some(enabled) = self.enabled {
            layer.enabled = enabled;
        }
        if let Some(opacity) = self.opacity {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(min) = self.min_active_altitude {
            layer.min_active_altitude = min;
        }
        if let Some(max) = self.max_active_altitude {
            layer.max_active_altitude = max;
        }
        if let Some(pick) = self.pick_enabled {
            layer.pick_enabled = pick;
        }
        for (key, value) in &self.properties {
            layer.renderable.set_property(key.clone(), value.clone());
        }
        Ok(())
    }
}

/// Serializable view of a layer, as pushed to change listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSummary {
    pub unique_id: Option<LayerId>,
    pub display_name: String,
    pub category: Option<Category>,
    pub enabled: bool,
    pub opacity: f64,
}

impl From<&Layer> for LayerSummary {
    fn from(layer: &Layer) -> Self {
        Self {
            unique_id: layer.id,
            display_name: layer.display_name.clone(),
            category: layer.category,
            enabled: layer.enabled,
            opacity: layer.opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Layer, LayerOptions, LayerSummary};
    use crate::category::Category;
    use crate::error::LayerError;
    use pretty_assertions::assert_eq;
    use scene::{Renderable, RenderableKind};
    use serde_json::json;

    fn compass() -> Layer {
        Layer::new("Compass", Renderable::new(RenderableKind::Compass))
    }

    #[test]
    fn new_layers_are_unattached_and_enabled() {
        let layer = compass();
        assert_eq!(layer.unique_id(), None);
        assert_eq!(layer.category(), None);
        assert!(layer.is_enabled());
        assert!(!layer.is_attached());
    }

    #[test]
    fn options_override_fields_and_properties() {
        let mut layer = compass();
        let options = LayerOptions::new()
            .category("Settings")
            .enabled(false)
            .opacity(1.7)
            .display_name("North Arrow")
            .property("size", json!(0.1));
        options.apply_to(&mut layer).expect("apply");

        assert_eq!(layer.category(), Some(Category::Setting));
        assert!(!layer.is_enabled());
        assert_eq!(layer.opacity, 1.0);
        assert_eq!(layer.display_name, "North Arrow");
        assert_eq!(layer.renderable.property("size"), Some(&json!(0.1)));
    }

    #[test]
    fn bad_category_is_reported() {
        let mut layer = compass();
        let err = LayerOptions::new()
            .category("weather")
            .apply_to(&mut layer)
            .unwrap_err();
        assert_eq!(err, LayerError::UnknownCategory("weather".to_string()));
    }

    #[test]
    fn options_parse_camel_case_and_collect_extras() {
        let options: LayerOptions = serde_json::from_value(json!({
            "category": "background",
            "enabled": true,
            "minActiveAltitude": 0,
            "detailControl": 1.25
        }))
        .expect("parse");
        assert_eq!(options.category.as_deref(), Some("background"));
        assert_eq!(options.min_active_altitude, Some(0.0));
        assert_eq!(options.properties.get("detailControl"), Some(&json!(1.25)));
        assert!(!options.properties.contains_key("enabled"));
    }

    #[test]
    fn summary_reflects_layer() {
        let layer = compass().with_category(Category::Setting).with_enabled(false);
        let summary = LayerSummary::from(&layer);
        assert_eq!(
            serde_json::to_value(&summary).expect("json"),
            json!({
                "uniqueId": null,
                "displayName": "Compass",
                "category": "setting",
                "enabled": false,
                "opacity": 1.0
            })
        );
    }
}
