//! Switching between the round globe and the flat map projections.

use std::fmt;
use std::rc::Rc;

use scene::{FlatProjection, GlobeModel, Hemisphere, RenderSurface};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Projection {
    ThreeD,
    Equirectangular,
    Mercator,
    NorthPolar,
    SouthPolar,
    NorthUps,
    SouthUps,
    NorthGnomonic,
    SouthGnomonic,
}

impl Projection {
    /// Index order used by numeric identifiers.
    pub const ALL: [Projection; 9] = [
        Projection::ThreeD,
        Projection::Equirectangular,
        Projection::Mercator,
        Projection::NorthPolar,
        Projection::SouthPolar,
        Projection::NorthUps,
        Projection::SouthUps,
        Projection::NorthGnomonic,
        Projection::SouthGnomonic,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Projection::ThreeD => "3D",
            Projection::Equirectangular => "Equirectangular",
            Projection::Mercator => "Mercator",
            Projection::NorthPolar => "North Polar",
            Projection::SouthPolar => "South Polar",
            Projection::NorthUps => "North UPS",
            Projection::SouthUps => "South UPS",
            Projection::NorthGnomonic => "North Gnomonic",
            Projection::SouthGnomonic => "South Gnomonic",
        }
    }

    /// Case-insensitive name match.
    pub fn from_name(name: &str) -> Option<Projection> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn from_index(index: usize) -> Option<Projection> {
        Self::ALL.get(index).copied()
    }

    /// The 2D projection this selects; `None` for the round globe.
    pub const fn flat(self) -> Option<FlatProjection> {
        match self {
            Projection::ThreeD => None,
            Projection::Equirectangular => Some(FlatProjection::Equirectangular),
            Projection::Mercator => Some(FlatProjection::Mercator),
            Projection::NorthPolar => Some(FlatProjection::PolarEquidistant(Hemisphere::North)),
            Projection::SouthPolar => Some(FlatProjection::PolarEquidistant(Hemisphere::South)),
            Projection::NorthUps => Some(FlatProjection::Ups(Hemisphere::North)),
            Projection::SouthUps => Some(FlatProjection::Ups(Hemisphere::South)),
            Projection::NorthGnomonic => Some(FlatProjection::Gnomonic(Hemisphere::North)),
            Projection::SouthGnomonic => Some(FlatProjection::Gnomonic(Hemisphere::South)),
        }
    }

    pub fn from_flat(flat: FlatProjection) -> Projection {
        match flat {
            FlatProjection::Equirectangular => Projection::Equirectangular,
            FlatProjection::Mercator => Projection::Mercator,
            FlatProjection::PolarEquidistant(Hemisphere::North) => Projection::NorthPolar,
            FlatProjection::PolarEquidistant(Hemisphere::South) => Projection::SouthPolar,
            FlatProjection::Ups(Hemisphere::North) => Projection::NorthUps,
            FlatProjection::Ups(Hemisphere::South) => Projection::SouthUps,
            FlatProjection::Gnomonic(Hemisphere::North) => Projection::NorthGnomonic,
            FlatProjection::Gnomonic(Hemisphere::South) => Projection::SouthGnomonic,
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Projection identifier as given by callers: an index into
/// [`Projection::ALL`] or a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectionSpec {
    Index(usize),
    Name(String),
}

impl ProjectionSpec {
    pub fn resolve(&self) -> Option<Projection> {
        match self {
            ProjectionSpec::Index(index) => Projection::from_index(*index),
            ProjectionSpec::Name(name) => Projection::from_name(name),
        }
    }
}

impl From<usize> for ProjectionSpec {
    fn from(index: usize) -> Self {
        ProjectionSpec::Index(index)
    }
}

impl From<&str> for ProjectionSpec {
    fn from(name: &str) -> Self {
        ProjectionSpec::Name(name.to_string())
    }
}

impl From<String> for ProjectionSpec {
    fn from(name: String) -> Self {
        ProjectionSpec::Name(name)
    }
}

impl From<Projection> for ProjectionSpec {
    fn from(projection: Projection) -> Self {
        ProjectionSpec::Name(projection.name().to_string())
    }
}

/// Caches one round and one flat globe model and swaps them on the surface.
#[derive(Debug, Default)]
pub struct ProjectionController {
    round: Option<Rc<GlobeModel>>,
    flat: Option<Rc<GlobeModel>>,
}

impl ProjectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes over an existing model (typically the surface's initial one) so
    /// later switches reuse it instead of creating a new one.
    pub fn adopt(&mut self, model: Rc<GlobeModel>) {
        if model.is_flat() {
            self.flat = Some(model);
        } else {
            self.round = Some(model);
        }
    }

    pub fn round_model(&self) -> Option<&Rc<GlobeModel>> {
        self.round.as_ref()
    }

    pub fn flat_model(&self) -> Option<&Rc<GlobeModel>> {
        self.flat.as_ref()
    }

    /// Activates the model for `spec` and returns the projection it named.
    ///
    /// Anything other than `3D` activates the flat model; an unrecognized
    /// identifier leaves its projection as it was.
    pub fn change_projection(
        &mut self,
        surface: &mut dyn RenderSurface,
        spec: impl Into<ProjectionSpec>,
    ) -> Option<Projection> {
        let spec = spec.into();
        let projection = spec.resolve();

        let model = match projection {
            Some(Projection::ThreeD) => {
                self.round.get_or_insert_with(|| Rc::new(GlobeModel::round()))
            }
            other => {
                let flat = self.flat.get_or_insert_with(|| Rc::new(GlobeModel::flat()));
                if let Some(p) = other.and_then(Projection::flat) {
                    flat.set_projection(p);
                }
                flat
            }
        };

        if !Rc::ptr_eq(model, &surface.globe_model()) {
            surface.set_globe_model(Rc::clone(model));
            surface.request_redraw();
        }
        debug!(?spec, ?projection, "projection changed");
        projection
    }

    /// Projection currently shown by `surface`.
    pub fn active(surface: &dyn RenderSurface) -> Projection {
        surface
            .globe_model()
            .projection()
            .map_or(Projection::ThreeD, Projection::from_flat)
    }
}
