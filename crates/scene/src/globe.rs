use std::cell::Cell;

use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Hemisphere {
    North,
    South,
}

/// 2D map projections available to a flat globe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum FlatProjection {
    Equirectangular,
    Mercator,
    PolarEquidistant(Hemisphere),
    /// Universal Polar Stereographic.
    Ups(Hemisphere),
    Gnomonic(Hemisphere),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum GlobeShape {
    Round,
    Flat,
}

/// Shape model the surface draws the earth with.
///
/// Models are shared between the projection controller and the surface via
/// `Rc`; a flat model's projection can be swapped in place while it is
/// active.
#[derive(Debug)]
pub struct GlobeModel {
    shape: GlobeShape,
    projection: Cell<FlatProjection>,
}

impl GlobeModel {
    /// Ellipsoidal earth with terrain elevations.
    pub fn round() -> Self {
        Self {
            shape: GlobeShape::Round,
            projection: Cell::new(FlatProjection::Equirectangular),
        }
    }

    pub fn flat() -> Self {
        Self {
            shape: GlobeShape::Flat,
            projection: Cell::new(FlatProjection::Equirectangular),
        }
    }

    pub fn shape(&self) -> GlobeShape {
        self.shape
    }

    pub fn is_flat(&self) -> bool {
        self.shape == GlobeShape::Flat
    }

    /// The active 2D projection; `None` for a round model.
    pub fn projection(&self) -> Option<FlatProjection> {
        self.is_flat().then(|| self.projection.get())
    }

    /// Returns `false` (and changes nothing) on a round model.
    pub fn set_projection(&self, projection: FlatProjection) -> bool {
        if !self.is_flat() {
            return false;
        }
        self.projection.set(projection);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{FlatProjection, GlobeModel, GlobeShape, Hemisphere};

    #[test]
    fn flat_model_defaults_to_equirectangular() {
        let flat = GlobeModel::flat();
        assert_eq!(flat.shape(), GlobeShape::Flat);
        assert_eq!(flat.projection(), Some(FlatProjection::Equirectangular));
        assert!(flat.set_projection(FlatProjection::Gnomonic(Hemisphere::South)));
        assert_eq!(
            flat.projection(),
            Some(FlatProjection::Gnomonic(Hemisphere::South))
        );
    }

    #[test]
    fn round_model_has_no_projection() {
        let round = GlobeModel::round();
        assert_eq!(round.projection(), None);
        assert!(!round.set_projection(FlatProjection::Mercator));
        assert_eq!(round.projection(), None);
    }
}
