//! Opaque renderable payloads handed to the rendering surface.
//!
//! A layer's payload describes *what* the engine should draw; the engine owns
//! every device resource behind it. Attribution and other post-render
//! touches are composed onto the payload as [`Decoration`]s instead of being
//! baked into layer subtypes.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

/// Free-form engine properties forwarded from layer options.
pub type PropertyMap = BTreeMap<String, Value>;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const LIGHT_GRAY: Self = Self([0.75, 0.75, 0.75, 1.0]);
    pub const DARK_GRAY: Self = Self([0.25, 0.25, 0.25, 1.0]);
}

/// Tiled imagery served by a remote provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagerySource {
    pub provider: String,
    pub dataset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    pub num_levels: u8,
    pub tile_size: u16,
    /// Request tiles with an alpha channel.
    pub transparent: bool,
}

impl ImagerySource {
    pub fn tiled(provider: impl Into<String>, dataset: impl Into<String>, num_levels: u8) -> Self {
        Self {
            provider: provider.into(),
            dataset: dataset.into(),
            service_url: None,
            num_levels,
            tile_size: 256,
            transparent: true,
        }
    }

    /// EPSG:4326 WMS imagery, requested opaque so labels do not bleed through.
    pub fn wms(service_url: impl Into<String>, layer_names: impl Into<String>, num_levels: u8) -> Self {
        Self {
            provider: "wms".to_string(),
            dataset: layer_names.into(),
            service_url: Some(service_url.into()),
            num_levels,
            tile_size: 256,
            transparent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderableKind {
    SingleImage { image_url: String },
    TiledImagery(ImagerySource),
    Compass,
    CoordinatesDisplay,
    ViewControls,
    Atmosphere { night_enabled: bool },
    StarField,
    Tessellation,
    Custom { name: String },
}

/// Per-frame sink that decorations draw into once the layers have rendered.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderContext {
    credits: Vec<ScreenCredit>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a screen credit; identical credits from several layers collapse.
    pub fn add_credit(&mut self, credit: ScreenCredit) {
        if !self.credits.contains(&credit) {
            self.credits.push(credit);
        }
    }

    pub fn credits(&self) -> &[ScreenCredit] {
        &self.credits
    }

    pub fn into_credits(self) -> Vec<ScreenCredit> {
        self.credits
    }
}

/// Hook run by the surface after the owning layer rendered in a frame.
pub trait Decoration: fmt::Debug {
    fn on_render_complete(&self, ctx: &mut RenderContext);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenCredit {
    pub text: String,
    pub color: Color,
}

impl ScreenCredit {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

impl Decoration for ScreenCredit {
    fn on_render_complete(&self, ctx: &mut RenderContext) {
        ctx.add_credit(self.clone());
    }
}

#[derive(Debug, Clone)]
pub struct Renderable {
    pub kind: RenderableKind,
    pub properties: PropertyMap,
    decorations: Vec<Rc<dyn Decoration>>,
}

impl Renderable {
    pub fn new(kind: RenderableKind) -> Self {
        Self {
            kind,
            properties: PropertyMap::new(),
            decorations: Vec::new(),
        }
    }

    pub fn with_decoration(mut self, decoration: impl Decoration + 'static) -> Self {
        self.decorations.push(Rc::new(decoration));
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn decoration_count(&self) -> usize {
        self.decorations.len()
    }

    pub fn render_complete(&self, ctx: &mut RenderContext) {
        for decoration in &self.decorations {
            decoration.on_render_complete(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, ImagerySource, RenderContext, Renderable, RenderableKind, ScreenCredit};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decorations_write_credits_once() {
        let credit = ScreenCredit::new("Imagery by EOX", Color::LIGHT_GRAY);
        let a = Renderable::new(RenderableKind::Compass).with_decoration(credit.clone());
        let b = Renderable::new(RenderableKind::StarField).with_decoration(credit.clone());

        let mut ctx = RenderContext::new();
        a.render_complete(&mut ctx);
        b.render_complete(&mut ctx);
        assert_eq!(ctx.credits(), &[credit]);
    }

    #[test]
    fn properties_are_last_writer_wins() {
        let mut r = Renderable::new(RenderableKind::Tessellation);
        r.set_property("detailControl", json!(1.5));
        r.set_property("detailControl", json!(3));
        assert_eq!(r.property("detailControl"), Some(&json!(3)));
        assert_eq!(r.property("missing"), None);
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let kind = RenderableKind::TiledImagery(ImagerySource::wms(
            "https://tiles.example/wms",
            "osm",
            16,
        ));
        let v = serde_json::to_value(&kind).expect("json");
        assert_eq!(v["type"], "tiled_imagery");
        assert_eq!(v["dataset"], "osm");
        assert_eq!(v["transparent"], false);
    }
}
