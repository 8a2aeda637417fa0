//! Ordered, categorized layer collection mirrored onto a render surface.

use std::collections::BTreeMap;
use std::fmt;

use foundation::{Clock, IdSequence, LayerId, SystemClock, Timestamp};
use scene::RenderSurface;
use tracing::debug;

use crate::catalog::{LayerCatalog, LayerKind};
use crate::category::Category;
use crate::error::LayerError;
use crate::layer::{Layer, LayerOptions, LayerSummary};
use crate::notify::{CategorySnapshot, CategoryUpdate, ListenerFilter, ListenerId, Listeners};

/// What to build a new layer from.
#[derive(Debug, Clone)]
pub enum LayerSource {
    /// Catalog type key or display-name fragment.
    Type(String),
    /// Position in catalog order.
    Index(usize),
    Kind(LayerKind),
    /// A layer built by the caller; must not be attached yet.
    Layer(Layer),
}

impl From<&str> for LayerSource {
    fn from(key: &str) -> Self {
        LayerSource::Type(key.to_string())
    }
}

impl From<String> for LayerSource {
    fn from(key: String) -> Self {
        LayerSource::Type(key)
    }
}

impl From<usize> for LayerSource {
    fn from(index: usize) -> Self {
        LayerSource::Index(index)
    }
}

impl From<LayerKind> for LayerSource {
    fn from(kind: LayerKind) -> Self {
        LayerSource::Kind(kind)
    }
}

impl From<Layer> for LayerSource {
    fn from(layer: Layer) -> Self {
        LayerSource::Layer(layer)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerLookup<'a> {
    Name(&'a str),
    Id(LayerId),
}

impl<'a> From<&'a str> for LayerLookup<'a> {
    fn from(name: &'a str) -> Self {
        LayerLookup::Name(name)
    }
}

impl From<LayerId> for LayerLookup<'_> {
    fn from(id: LayerId) -> Self {
        LayerLookup::Id(id)
    }
}

/// Owns every attached layer and keeps the surface's draw list in sync.
///
/// Layers are kept grouped by category in draw order; within a category they
/// stay in insertion order. Every mutation stamps the category and pushes a
/// snapshot to interested listeners.
pub struct LayerRegistry {
    catalog: LayerCatalog,
    layers: Vec<Layer>,
    ids: IdSequence,
    modified: BTreeMap<Category, Timestamp>,
    clock: Box<dyn Clock>,
    listeners: Listeners,
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            catalog: LayerCatalog::standard().clone(),
            layers: Vec::new(),
            ids: IdSequence::new(),
            modified: BTreeMap::new(),
            clock: Box::new(clock),
            listeners: Listeners::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: LayerCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    /// Affects layers built from the catalog from now on.
    pub fn set_image_base_url(&mut self, url: impl Into<String>) {
        self.catalog = self.catalog.clone().with_image_base_url(url);
    }

    /// Builds a detached layer from the catalog. No registry state changes.
    pub fn create_layer(&self, type_key: &str) -> Result<Layer, LayerError> {
        self.catalog.create_layer(type_key)
    }

    /// Builds or takes a layer, applies `options`, assigns its id and attaches
    /// it at the end of its category's run.
    pub fn add_layer(
        &mut self,
        surface: &mut dyn RenderSurface,
        source: impl Into<LayerSource>,
        options: &LayerOptions,
    ) -> Result<&Layer, LayerError> {
        let mut layer = match source.into() {
            LayerSource::Type(key) => self.catalog.create_layer(&key)?,
            LayerSource::Index(index) => match self.catalog.get(index) {
                Some(kind) => self.catalog.instantiate(kind),
                None => return Err(LayerError::UnknownLayerType(index.to_string())),
            },
            LayerSource::Kind(kind) => self.catalog.instantiate(kind),
            LayerSource::Layer(layer) => {
                if let Some(id) = layer.unique_id() {
                    return Err(LayerError::InvalidLayerArgument(format!(
                        "layer {:?} is already attached as {id}",
                        layer.display_name
                    )));
                }
                layer
            }
        };
        options.apply_to(&mut layer)?;

        let category = layer.category().unwrap_or(Category::Base);
        let id = self.ids.next_id();
        layer.assign(id, category);

        let index = self
            .layers
            .iter()
            .filter(|l| l.category().is_some_and(|c| c <= category))
            .count();
        surface.attach_layer(index, layer.surface_layer(id));
        surface.request_redraw();
        debug!(%id, name = %layer.display_name, category = category.key(), index, "layer added");

        self.layers.insert(index, layer);
        self.touch(category);
        Ok(&self.layers[index])
    }

    /// First layer whose display name or unique id matches.
    pub fn get_layer<'a>(&self, lookup: impl Into<LayerLookup<'a>>) -> Option<&Layer> {
        match lookup.into() {
            LayerLookup::Name(name) => self.layers.iter().find(|l| l.display_name == name),
            LayerLookup::Id(id) => self.layers.iter().find(|l| l.unique_id() == Some(id)),
        }
    }

    /// All layers in draw order, or only those of the named category.
    pub fn get_layers(&self, category: Option<&str>) -> Result<Vec<&Layer>, LayerError> {
        match category {
            None => Ok(self.layers.iter().collect()),
            Some(name) => {
                let category = Category::resolve(name)?;
                Ok(self.layers_in(category).collect())
            }
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_in(&self, category: Category) -> impl Iterator<Item = &Layer> {
        self.layers
            .iter()
            .filter(move |l| l.category() == Some(category))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Flips a layer's enabled flag and returns the new state.
    ///
    /// Base layers are exclusive: every other base layer is disabled before
    /// the flip.
    pub fn toggle_layer(
        &mut self,
        surface: &mut dyn RenderSurface,
        id: LayerId,
    ) -> Result<bool, LayerError> {
        let pos = self.position(id)?;
        let category = self.layers[pos].category().unwrap_or(Category::Base);

        if category == Category::Base {
            for (i, other) in self.layers.iter_mut().enumerate() {
                if i != pos && other.category() == Some(Category::Base) && other.is_enabled() {
                    other.set_enabled(false);
                    if let Some(other_id) = other.unique_id() {
                        surface.sync_layer(other.surface_layer(other_id));
                    }
                }
            }
        }

        let layer = &mut self.layers[pos];
        let enabled = !layer.is_enabled();
        layer.set_enabled(enabled);
        surface.sync_layer(layer.surface_layer(id));
        surface.request_redraw();
        debug!(%id, enabled, category = category.key(), "layer toggled");

        self.touch(category);
        Ok(enabled)
    }

    /// Detaches a layer. Its id is retired, never handed out again.
    pub fn remove_layer(
        &mut self,
        surface: &mut dyn RenderSurface,
        id: LayerId,
    ) -> Result<Layer, LayerError> {
        let pos = self.position(id)?;
        let layer = self.layers.remove(pos);
        surface.detach_layer(id);
        surface.request_redraw();
        debug!(%id, name = %layer.display_name, "layer removed");

        self.touch(layer.category().unwrap_or(Category::Base));
        Ok(layer)
    }

    pub fn last_modified(&self, category: Category) -> Option<Timestamp> {
        self.modified.get(&category).copied()
    }

    pub fn subscribe(
        &mut self,
        filter: ListenerFilter,
        callback: impl FnMut(&CategoryUpdate) + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(filter, Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Current snapshot of one category, stamped with its last modification.
    pub fn snapshot(&self, category: Category) -> CategorySnapshot {
        CategorySnapshot {
            layers: self.layers_in(category).map(LayerSummary::from).collect(),
            last_updated: self.last_modified(category).unwrap_or(Timestamp(0)),
        }
    }

    fn position(&self, id: LayerId) -> Result<usize, LayerError> {
        self.layers
            .iter()
            .position(|l| l.unique_id() == Some(id))
            .ok_or(LayerError::LayerNotFound(id))
    }

    fn touch(&mut self, category: Category) {
        let now = self.clock.now();
        self.modified.insert(category, now);
        if self.listeners.wants(category) {
            let update = CategoryUpdate {
                category,
                snapshot: self.snapshot(category),
            };
            self.listeners.publish(&update);
        }
    }
}

impl fmt::Debug for LayerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerRegistry")
            .field("layers", &self.layers.len())
            .field("next_id", &self.ids.peek())
            .field("modified", &self.modified)
            .field("listeners", &self.listeners)
            .finish()
    }
}
