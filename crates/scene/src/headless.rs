//! In-memory rendering surface.
//!
//! Keeps the draw list, camera and globe model the way an engine would, and
//! answers picks with closed-form math: an orthographic view of the WGS84
//! ellipsoid for round models and a linear plate carrée for flat ones. Used by
//! the command line tool and throughout the tests.

use std::collections::VecDeque;
use std::rc::Rc;

use foundation::LayerId;
use foundation::math::{EnuFrame, Position, ecef_to_geodetic, ellipsoid_point_along};
use tracing::trace;

use crate::event::{PointerEvent, PointerEventKind};
use crate::globe::GlobeModel;
use crate::picking::{PickList, PickedItem};
use crate::renderable::{RenderContext, ScreenCredit};
use crate::surface::{Camera, DEFAULT_RANGE_M, RenderSurface, SurfaceLayer};

/// What one simulated frame drew.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub drawn: Vec<LayerId>,
    pub credits: Vec<ScreenCredit>,
}

#[derive(Debug)]
pub struct HeadlessSurface {
    canvas_id: String,
    width: f64,
    height: f64,
    layers: Vec<SurfaceLayer>,
    globe: Rc<GlobeModel>,
    camera: Camera,
    listening: Vec<PointerEventKind>,
    queue: VecDeque<PointerEvent>,
    redraws: u64,
    animated_moves: u64,
}

impl HeadlessSurface {
    pub fn new(canvas_id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            width: width.max(1.0),
            height: height.max(1.0),
            layers: Vec::new(),
            globe: Rc::new(GlobeModel::round()),
            camera: Camera::default(),
            listening: Vec::new(),
            queue: VecDeque::new(),
            redraws: 0,
            animated_moves: 0,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn layers(&self) -> &[SurfaceLayer] {
        &self.layers
    }

    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn animated_moves(&self) -> u64 {
        self.animated_moves
    }

    pub fn is_listening(&self, kind: PointerEventKind) -> bool {
        self.listening.contains(&kind)
    }

    /// Delivers an input event; returns `false` when nobody listens for its kind.
    pub fn push_event(&mut self, event: PointerEvent) -> bool {
        if !self.is_listening(event.kind()) {
            return false;
        }
        self.queue.push_back(event);
        true
    }

    /// Draws one frame: every active layer in order, then its decorations.
    pub fn draw_frame(&self) -> FrameReport {
        let mut ctx = RenderContext::new();
        let mut drawn = Vec::new();
        for layer in &self.layers {
            if !layer.is_active_at(self.camera.range) {
                continue;
            }
            drawn.push(layer.id);
            layer.renderable.render_complete(&mut ctx);
        }
        trace!(canvas = %self.canvas_id, drawn = drawn.len(), "frame drawn");
        FrameReport {
            drawn,
            credits: ctx.into_credits(),
        }
    }

    fn pick_round(&self, x: f64, y: f64) -> Option<Position> {
        let half = 0.5 * self.width.min(self.height);
        let radius_px = half * (DEFAULT_RANGE_M / self.camera.range.max(1.0));
        let u = (x - 0.5 * self.width) / radius_px;
        let v = (y - 0.5 * self.height) / radius_px;
        let r2 = u * u + v * v;
        if r2 > 1.0 {
            return None;
        }

        let frame = EnuFrame::at(
            self.camera.latitude.to_radians(),
            self.camera.longitude.to_radians(),
        );
        // Screen y grows downward, north is up.
        let dir = frame.to_world(u, -v, (1.0 - r2).sqrt());
        let geo = ecef_to_geodetic(ellipsoid_point_along(dir)?);
        let mut position = Position::from(geo);
        position.altitude = 0.0;
        Some(position)
    }

    fn pick_flat(&self, x: f64, y: f64) -> Option<Position> {
        let deg_per_px = 360.0 / self.width * (self.camera.range / DEFAULT_RANGE_M);
        let lon = self.camera.longitude + (x - 0.5 * self.width) * deg_per_px;
        let lat = self.camera.latitude - (y - 0.5 * self.height) * deg_per_px;
        if lat.abs() > 90.0 {
            return None;
        }
        Some(Position::new(lat, lon, 0.0).normalized())
    }
}

impl RenderSurface for HeadlessSurface {
    fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    fn attach_layer(&mut self, index: usize, layer: SurfaceLayer) {
        let index = index.min(self.layers.len());
        trace!(id = %layer.id, index, "attach layer");
        self.layers.insert(index, layer);
    }

    fn detach_layer(&mut self, id: LayerId) -> Option<SurfaceLayer> {
        let idx = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(idx))
    }

    fn sync_layer(&mut self, layer: SurfaceLayer) {
        if let Some(slot) = self.layers.iter_mut().find(|l| l.id == layer.id) {
            *slot = layer;
        }
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn pick_terrain(&self, x: f64, y: f64) -> PickList {
        let terrain = if self.globe.is_flat() {
            self.pick_flat(x, y)
        } else {
            self.pick_round(x, y)
        };
        terrain.map(PickedItem::Terrain).into_iter().collect()
    }

    fn globe_model(&self) -> Rc<GlobeModel> {
        Rc::clone(&self.globe)
    }

    fn set_globe_model(&mut self, model: Rc<GlobeModel>) {
        self.globe = model;
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn look_at(&mut self, camera: Camera) {
        self.camera = camera;
    }

    fn go_to(&mut self, target: Position) {
        self.animated_moves += 1;
        self.camera = Camera {
            latitude: target.latitude,
            longitude: target.longitude,
            range: target.altitude,
        };
    }

    fn listen(&mut self, kind: PointerEventKind) {
        if !self.listening.contains(&kind) {
            self.listening.push(kind);
        }
    }

    fn drain_events(&mut self) -> Vec<PointerEvent> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::HeadlessSurface;
    use crate::event::{PointerEvent, PointerEventKind};
    use crate::globe::GlobeModel;
    use crate::renderable::{Color, Renderable, RenderableKind, ScreenCredit};
    use crate::surface::{Camera, RenderSurface, SurfaceLayer};
    use foundation::LayerId;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn layer(id: u64, enabled: bool) -> SurfaceLayer {
        SurfaceLayer {
            id: LayerId(id),
            display_name: format!("layer {id}"),
            enabled,
            opacity: 1.0,
            min_active_altitude: 0.0,
            max_active_altitude: f64::MAX,
            pick_enabled: true,
            renderable: Renderable::new(RenderableKind::Compass),
        }
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ~= {b}");
    }

    #[test]
    fn attach_clamps_index_and_detach_removes() {
        let mut s = HeadlessSurface::new("c", 800.0, 600.0);
        s.attach_layer(5, layer(1, true));
        s.attach_layer(0, layer(2, true));
        s.attach_layer(1, layer(3, true));
        assert_eq!(s.layer_ids(), vec![LayerId(2), LayerId(3), LayerId(1)]);

        assert!(s.detach_layer(LayerId(3)).is_some());
        assert!(s.detach_layer(LayerId(3)).is_none());
        assert_eq!(s.layer_ids(), vec![LayerId(2), LayerId(1)]);
    }

    #[test]
    fn frame_skips_disabled_layers_and_collects_credits() {
        let mut s = HeadlessSurface::new("c", 800.0, 600.0);
        let credit = ScreenCredit::new("Imagery credit", Color::DARK_GRAY);
        let mut credited = layer(1, true);
        credited.renderable = Renderable::new(RenderableKind::StarField).with_decoration(credit.clone());
        s.attach_layer(0, credited);
        s.attach_layer(1, layer(2, false));

        let report = s.draw_frame();
        assert_eq!(report.drawn, vec![LayerId(1)]);
        assert_eq!(report.credits, vec![credit]);

        let mut off = layer(1, false);
        off.display_name = "renamed".to_string();
        s.sync_layer(off);
        assert!(s.draw_frame().credits.is_empty());
        assert_eq!(s.layers()[0].display_name, "renamed");
    }

    #[test]
    fn round_pick_at_center_hits_camera_target() {
        let mut s = HeadlessSurface::new("c", 800.0, 600.0);
        s.look_at(Camera {
            latitude: 0.0,
            longitude: 45.0,
            ..Camera::default()
        });
        let hit = s.pick_terrain(400.0, 300.0).terrain_object().expect("terrain");
        assert_close(hit.latitude, 0.0, 1e-9);
        assert_close(hit.longitude, 45.0, 1e-9);

        // Corners look past the limb into space.
        assert!(s.pick_terrain(0.0, 0.0).terrain_object().is_none());
    }

    #[test]
    fn round_pick_above_center_is_north() {
        let s = HeadlessSurface::new("c", 800.0, 600.0);
        let hit = s.pick_terrain(400.0, 200.0).terrain_object().expect("terrain");
        assert!(hit.latitude > 0.0);
        assert_close(hit.longitude, 0.0, 1e-9);
    }

    #[test]
    fn flat_pick_is_linear_in_longitude() {
        let mut s = HeadlessSurface::new("c", 720.0, 360.0);
        s.set_globe_model(Rc::new(GlobeModel::flat()));
        let hit = s.pick_terrain(540.0, 180.0).terrain_object().expect("terrain");
        assert_close(hit.longitude, 90.0, 1e-9);
        assert_close(hit.latitude, 0.0, 1e-9);
    }

    #[test]
    fn events_are_only_queued_when_listening() {
        let mut s = HeadlessSurface::new("c", 10.0, 10.0);
        assert!(!s.push_event(PointerEvent::click(1.0, 1.0)));
        s.listen(PointerEventKind::Click);
        s.listen(PointerEventKind::Click);
        assert!(s.push_event(PointerEvent::click(2.0, 2.0)));
        assert_eq!(s.drain_events(), vec![PointerEvent::click(2.0, 2.0)]);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn go_to_counts_animations() {
        let mut s = HeadlessSurface::new("c", 10.0, 10.0);
        s.go_to(foundation::math::Position::new(34.2, -119.2, 50_000.0));
        assert_eq!(s.animated_moves(), 1);
        assert_eq!(s.camera().range, 50_000.0);
        s.request_redraw();
        assert_eq!(s.redraw_count(), 1);
    }
}
