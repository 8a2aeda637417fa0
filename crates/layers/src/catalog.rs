//! Built-in layer kinds and the catalog that resolves type names to them.

use std::borrow::Cow;

use scene::{Color, ImagerySource, Renderable, RenderableKind, ScreenCredit};
use serde::Serialize;
use tracing::warn;

use crate::category::Category;
use crate::error::LayerError;
use crate::layer::{Layer, LayerOptions};

/// Where the bundled WorldWind images are served from unless configured.
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://files.worldwind.arc.nasa.gov/artifactory/web/0.9.0/";
const BMNG_IMAGE: &str = "images/BMNG_world.topo.bathy.200405.3.2048x1024.jpg";
const EOX_WMS: &str = "https://tiles.maps.eox.at/wms";
const USGS_TOPO_WMS: &str =
    "https://basemap.nationalmap.gov:443/arcgis/services/USGSTopo/MapServer/WmsServer?";
const SENTINEL2_CREDIT: &str = "Sentinel-2 cloudless by EOX IT Services GmbH";
const OSM_CREDIT: &str =
    "OpenStreetMap { Data © OpenStreetMap contributors, Rendering © MapServer and EOX }";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum LayerKind {
    BackgroundImagery,
    BlueMarble,
    BlueMarbleLandsat,
    BingAerial,
    BingAerialLabels,
    BingRoads,
    EoxSentinel2,
    EoxSentinel2Labels,
    EoxOpenStreetMap,
    UsgsTopo,
    Compass,
    Coordinates,
    ViewControls,
    Atmosphere,
    Stars,
    Tessellation,
}

impl LayerKind {
    /// Catalog order; substring lookups take the first match in this order.
    pub const ALL: [LayerKind; 16] = [
        LayerKind::BackgroundImagery,
        LayerKind::BlueMarble,
        LayerKind::BlueMarbleLandsat,
        LayerKind::BingAerial,
        LayerKind::BingAerialLabels,
        LayerKind::BingRoads,
        LayerKind::EoxSentinel2,
        LayerKind::EoxSentinel2Labels,
        LayerKind::EoxOpenStreetMap,
        LayerKind::UsgsTopo,
        LayerKind::Compass,
        LayerKind::Coordinates,
        LayerKind::ViewControls,
        LayerKind::Atmosphere,
        LayerKind::Stars,
        LayerKind::Tessellation,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            LayerKind::BackgroundImagery => "background-imagery",
            LayerKind::BlueMarble => "blue-marble",
            LayerKind::BlueMarbleLandsat => "blue-marble-landsat",
            LayerKind::BingAerial => "bing-aerial",
            LayerKind::BingAerialLabels => "bing-aerial-labels",
            LayerKind::BingRoads => "bing-roads",
            LayerKind::EoxSentinel2 => "eox-sentinel2",
            LayerKind::EoxSentinel2Labels => "eox-sentinel2-labels",
            LayerKind::EoxOpenStreetMap => "eox-openstreetmap",
            LayerKind::UsgsTopo => "usgs-topo",
            LayerKind::Compass => "compass",
            LayerKind::Coordinates => "coordinates",
            LayerKind::ViewControls => "view-controls",
            LayerKind::Atmosphere => "atmosphere",
            LayerKind::Stars => "stars",
            LayerKind::Tessellation => "tessellation",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            LayerKind::BackgroundImagery => "Blue Marble Background",
            LayerKind::BlueMarble => "Blue Marble",
            LayerKind::BlueMarbleLandsat => "Blue Marble and LandSat",
            LayerKind::BingAerial => "Bing Aerial",
            LayerKind::BingAerialLabels => "Bing Aerial with Labels",
            LayerKind::BingRoads => "Bing Roads",
            LayerKind::EoxSentinel2 => "EOX Sentinal2",
            LayerKind::EoxSentinel2Labels => "EOX Sentinal2 with Labels",
            LayerKind::EoxOpenStreetMap => "EOX OpenStreetMap",
            LayerKind::UsgsTopo => "USGS Topo Basemap",
            LayerKind::Compass => "Compass",
            LayerKind::Coordinates => "Coordinates",
            LayerKind::ViewControls => "View Controls",
            LayerKind::Atmosphere => "Atmosphere and Day/Night",
            LayerKind::Stars => "Stars",
            LayerKind::Tessellation => "Tessellation",
        }
    }

    pub const fn default_category(self) -> Category {
        match self {
            LayerKind::BackgroundImagery => Category::Background,
            LayerKind::BlueMarble
            | LayerKind::BlueMarbleLandsat
            | LayerKind::BingAerial
            | LayerKind::BingAerialLabels
            | LayerKind::BingRoads
            | LayerKind::EoxSentinel2
            | LayerKind::EoxSentinel2Labels
            | LayerKind::UsgsTopo => Category::Base,
            LayerKind::EoxOpenStreetMap => Category::Overlay,
            LayerKind::Compass
            | LayerKind::Coordinates
            | LayerKind::ViewControls
            | LayerKind::Atmosphere
            | LayerKind::Stars => Category::Setting,
            LayerKind::Tessellation => Category::Debug,
        }
    }

    /// Catalog-defined overrides applied right after construction.
    pub fn defaults(self) -> LayerOptions {
        let options = LayerOptions::new().category(self.default_category().key());
        match self {
            LayerKind::BackgroundImagery => options.min_active_altitude(0.0),
            LayerKind::EoxOpenStreetMap => options.opacity(0.8),
            LayerKind::Atmosphere => options.opacity(0.7),
            LayerKind::Tessellation => options.enabled(false),
            _ => options,
        }
    }

    /// Builds the renderable payload for this kind. Bundled image paths are
    /// resolved against `image_base_url`.
    pub fn build(self, image_base_url: &str) -> Renderable {
        match self {
            LayerKind::BackgroundImagery => Renderable::new(RenderableKind::SingleImage {
                image_url: image_url(image_base_url, BMNG_IMAGE),
            }),
            LayerKind::BlueMarble => tiled("worldwind", "BlueMarble-200405", 5),
            LayerKind::BlueMarbleLandsat => tiled("worldwind", "BlueMarble-200405+LandSat", 10),
            LayerKind::BingAerial => tiled("bing", "Aerial", 20),
            LayerKind::BingAerialLabels => tiled("bing", "AerialWithLabels", 20),
            LayerKind::BingRoads => tiled("bing", "Road", 20),
            LayerKind::EoxSentinel2 => wms(EOX_WMS, "s2cloudless", 16)
                .with_decoration(ScreenCredit::new(SENTINEL2_CREDIT, Color::LIGHT_GRAY)),
            LayerKind::EoxSentinel2Labels => wms(EOX_WMS, "s2cloudless_with_labels", 16)
                .with_decoration(ScreenCredit::new(SENTINEL2_CREDIT, Color::LIGHT_GRAY)),
            LayerKind::EoxOpenStreetMap => wms(EOX_WMS, "osm", 16)
                .with_decoration(ScreenCredit::new(OSM_CREDIT, Color::DARK_GRAY)),
            LayerKind::UsgsTopo => wms(USGS_TOPO_WMS, "0", 15),
            LayerKind::Compass => Renderable::new(RenderableKind::Compass),
            LayerKind::Coordinates => Renderable::new(RenderableKind::CoordinatesDisplay),
            LayerKind::ViewControls => Renderable::new(RenderableKind::ViewControls),
            LayerKind::Atmosphere => Renderable::new(RenderableKind::Atmosphere {
                night_enabled: false,
            }),
            LayerKind::Stars => Renderable::new(RenderableKind::StarField),
            LayerKind::Tessellation => Renderable::new(RenderableKind::Tessellation),
        }
    }
}

fn image_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{path}", base.trim_end_matches('/'))
    }
}

fn tiled(provider: &str, dataset: &str, num_levels: u8) -> Renderable {
    Renderable::new(RenderableKind::TiledImagery(ImagerySource::tiled(
        provider, dataset, num_levels,
    )))
}

fn wms(service: &str, layer_names: &str, num_levels: u8) -> Renderable {
    Renderable::new(RenderableKind::TiledImagery(ImagerySource::wms(
        service,
        layer_names,
        num_levels,
    )))
}

static STANDARD: LayerCatalog = LayerCatalog::new(&LayerKind::ALL);

/// Table of constructible layer kinds plus the location of bundled images.
#[derive(Debug, Clone)]
pub struct LayerCatalog {
    kinds: &'static [LayerKind],
    image_base_url: Cow<'static, str>,
}

impl LayerCatalog {
    pub const fn new(kinds: &'static [LayerKind]) -> Self {
        Self {
            kinds,
            image_base_url: Cow::Borrowed(DEFAULT_IMAGE_BASE_URL),
        }
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = Cow::Owned(url.into());
        self
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Every built-in kind in catalog order.
    pub fn standard() -> &'static LayerCatalog {
        &STANDARD
    }

    pub fn kinds(&self) -> &'static [LayerKind] {
        self.kinds
    }

    pub fn get(&self, index: usize) -> Option<LayerKind> {
        self.kinds.get(index).copied()
    }

    /// Exact type key first, then a case-insensitive display-name substring.
    pub fn find(&self, type_key: &str) -> Option<LayerKind> {
        if let Some(kind) = self.kinds.iter().find(|k| k.key() == type_key) {
            return Some(*kind);
        }
        let needle = type_key.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.kinds
            .iter()
            .find(|k| k.display_name().to_lowercase().contains(&needle))
            .copied()
    }

    /// Builds a detached layer of `kind` with the catalog defaults applied.
    pub fn instantiate(&self, kind: LayerKind) -> Layer {
        let mut layer =
            Layer::new(kind.display_name(), kind.build(&self.image_base_url))
                .with_category(kind.default_category());
        if let Err(err) = kind.defaults().apply_to(&mut layer) {
            warn!(kind = kind.key(), %err, "catalog defaults rejected");
        }
        layer
    }

    pub fn create_layer(&self, type_key: &str) -> Result<Layer, LayerError> {
        self.find(type_key)
            .map(|kind| self.instantiate(kind))
            .ok_or_else(|| LayerError::UnknownLayerType(type_key.to_string()))
    }
}
