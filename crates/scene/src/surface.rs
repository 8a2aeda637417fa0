//! Contract between the globe logic and the external rendering engine.

use std::rc::Rc;

use foundation::LayerId;
use foundation::math::{Position, WGS84_A};

use crate::event::{PointerEvent, PointerEventKind};
use crate::globe::GlobeModel;
use crate::picking::PickList;
use crate::renderable::Renderable;

/// Camera range used by freshly created surfaces (meters from the look-at point).
pub const DEFAULT_RANGE_M: f64 = 3.0 * WGS84_A;

/// Look-at camera: a geographic target and the eye distance from it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub latitude: f64,
    pub longitude: f64,
    pub range: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            range: DEFAULT_RANGE_M,
        }
    }
}

impl Camera {
    pub fn target(&self) -> Position {
        Position::new(self.latitude, self.longitude, 0.0)
    }
}

/// Draw state of one layer as seen by the surface.
#[derive(Debug, Clone)]
pub struct SurfaceLayer {
    pub id: LayerId,
    pub display_name: String,
    pub enabled: bool,
    pub opacity: f64,
    pub min_active_altitude: f64,
    pub max_active_altitude: f64,
    /// Whether the layer's shapes take part in picking.
    pub pick_enabled: bool,
    pub renderable: Renderable,
}

impl SurfaceLayer {
    /// Whether the layer draws with the eye at `altitude` meters.
    pub fn is_active_at(&self, altitude: f64) -> bool {
        self.enabled
            && altitude >= self.min_active_altitude
            && altitude <= self.max_active_altitude
    }
}

/// Rendering engine owning the canvas, camera, scene graph and device resources.
///
/// Layer state changes always go through this trait; the engine is never
/// bypassed. Redraw requests are hints, the frame loop runs on its own.
pub trait RenderSurface {
    fn canvas_id(&self) -> &str;

    /// Inserts a layer into the draw list at `index` (clamped to the list length).
    fn attach_layer(&mut self, index: usize, layer: SurfaceLayer);

    fn detach_layer(&mut self, id: LayerId) -> Option<SurfaceLayer>;

    /// Replaces the draw state of an attached layer, matched by id.
    fn sync_layer(&mut self, layer: SurfaceLayer);

    fn request_redraw(&mut self);

    /// Picks the terrain (and anything drawn over it) under a canvas point.
    fn pick_terrain(&self, x: f64, y: f64) -> PickList;

    fn globe_model(&self) -> Rc<GlobeModel>;

    fn set_globe_model(&mut self, model: Rc<GlobeModel>);

    fn camera(&self) -> Camera;

    /// Places the camera without animation.
    fn look_at(&mut self, camera: Camera);

    /// Animates the camera towards `target`; the altitude becomes the range.
    fn go_to(&mut self, target: Position);

    /// Subscribes to a pointer event kind; unsubscribed kinds are not delivered.
    fn listen(&mut self, kind: PointerEventKind);

    /// Takes the pointer events received since the last call, oldest first.
    fn drain_events(&mut self) -> Vec<PointerEvent>;
}

#[cfg(test)]
mod tests {
    use super::{Camera, DEFAULT_RANGE_M, SurfaceLayer};
    use crate::renderable::{Renderable, RenderableKind};
    use foundation::LayerId;

    #[test]
    fn activity_respects_altitude_window() {
        let layer = SurfaceLayer {
            id: LayerId(1),
            display_name: "Stars".to_string(),
            enabled: true,
            opacity: 1.0,
            min_active_altitude: 3.0e6,
            max_active_altitude: f64::MAX,
            pick_enabled: false,
            renderable: Renderable::new(RenderableKind::StarField),
        };
        assert!(layer.is_active_at(DEFAULT_RANGE_M));
        assert!(!layer.is_active_at(1_000.0));

        let disabled = SurfaceLayer {
            enabled: false,
            ..layer
        };
        assert!(!disabled.is_active_at(DEFAULT_RANGE_M));
    }

    #[test]
    fn default_camera_targets_origin() {
        let cam = Camera::default();
        assert_eq!(cam.target().latitude, 0.0);
        assert_eq!(cam.range, DEFAULT_RANGE_M);
    }
}
