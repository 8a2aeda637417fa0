//! The mounted globe: one surface plus the registry, projection and
//! interaction state that drive it.

use foundation::math::Position;
use foundation::{Clock, LayerId, SystemClock, Timestamp};
use layers::{
    Category, CategoryUpdate, Layer, LayerError, LayerKind, LayerLookup, LayerOptions,
    LayerRegistry, LayerSource, ListenerFilter, ListenerId,
};
use scene::{PointerEvent, PointerEventKind, RenderSurface};
use tracing::{info, warn};

use crate::config::{GlobeConfig, GlobeProps};
use crate::error::GlobeError;
use crate::interaction::{ClickDrop, CursorStyle, DropOutcome};
use crate::projection::{Projection, ProjectionController, ProjectionSpec};

#[derive(Debug)]
pub struct Globe<S: RenderSurface> {
    surface: S,
    registry: LayerRegistry,
    projections: ProjectionController,
    drop: ClickDrop,
    props: GlobeProps,
    valid: bool,
}

impl<S: RenderSurface> Globe<S> {
    /// Creates the surface and brings the globe to its configured state.
    ///
    /// Configured layers that fail to resolve are logged and skipped.
    pub fn mount(
        config: GlobeConfig,
        create_surface: impl FnOnce(&str) -> S,
    ) -> Result<Self, GlobeError> {
        Self::mount_with_registry(config, LayerRegistry::new(), create_surface)
    }

    pub fn mount_with_registry(
        config: GlobeConfig,
        mut registry: LayerRegistry,
        create_surface: impl FnOnce(&str) -> S,
    ) -> Result<Self, GlobeError> {
        if let Some(url) = &config.base_url {
            registry.set_image_base_url(url.clone());
        }
        let canvas_id = config
            .canvas_id
            .clone()
            .unwrap_or_else(|| format!("canvas_{}", SystemClock.now().as_millis()));
        let surface = create_surface(&canvas_id);

        let mut globe = Self {
            surface,
            registry,
            projections: ProjectionController::new(),
            drop: ClickDrop::new(),
            props: config.props(),
            valid: false,
        };

        globe.projections.adopt(globe.surface.globe_model());
        if let Some(spec) = config.projection.clone() {
            globe.change_projection(spec);
        }

        globe.surface.listen(PointerEventKind::Click);
        globe.surface.listen(PointerEventKind::TouchEnd);

        let background = LayerOptions::new()
            .category(Category::Background.key())
            .enabled(true)
            .min_active_altitude(0.0);
        globe.add_layer(LayerKind::BackgroundImagery, &background)?;

        for entry in config.layers {
            let added = entry
                .into_parts()
                .and_then(|(source, options)| globe.add_layer(source, &options).map(|_| ()));
            if let Err(err) = added {
                warn!(canvas = %canvas_id, %err, "skipping configured layer");
            }
        }

        if let (Some(latitude), Some(longitude)) = (config.latitude, config.longitude) {
            globe.look_at(Some(latitude), Some(longitude), config.altitude);
        }

        globe.valid = true;
        info!(
            canvas = %canvas_id,
            layers = globe.registry.len(),
            projection = %globe.projection(),
            "globe mounted"
        );
        Ok(globe)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn canvas_id(&self) -> &str {
        self.surface.canvas_id()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn props(&self) -> GlobeProps {
        self.props
    }

    /// Applies new host props. Camera changes animate; the return value is
    /// always `false` since the host never needs to re-render.
    pub fn update_props(&mut self, next: GlobeProps) -> bool {
        if next != self.props {
            let camera = self.surface.camera();
            self.go_to(
                next.latitude.unwrap_or(camera.latitude),
                next.longitude.unwrap_or(camera.longitude),
                next.altitude.unwrap_or(camera.range),
            );
        }
        self.props = next;
        false
    }

    /// Animated move to the given position; `altitude` is the eye distance.
    pub fn go_to(&mut self, latitude: f64, longitude: f64, altitude: f64) {
        self.surface.go_to(Position::new(latitude, longitude, altitude));
    }

    /// Immediate camera placement. Only the given coordinates change.
    pub fn look_at(
        &mut self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        altitude: Option<f64>,
    ) {
        let mut camera = self.surface.camera();
        if let Some(latitude) = latitude {
            camera.latitude = latitude;
        }
        if let Some(longitude) = longitude {
            camera.longitude = longitude;
        }
        if let Some(altitude) = altitude {
            camera.range = altitude;
        }
        self.surface.look_at(camera);
        self.surface.request_redraw();
    }

    pub fn redraw(&mut self) {
        self.surface.request_redraw();
    }

    pub fn change_projection(&mut self, spec: impl Into<ProjectionSpec>) -> Option<Projection> {
        self.projections.change_projection(&mut self.surface, spec)
    }

    pub fn projection(&self) -> Projection {
        ProjectionController::active(&self.surface)
    }

    pub fn create_layer(&self, type_key: &str) -> Result<Layer, LayerError> {
        self.registry.create_layer(type_key)
    }

    pub fn add_layer(
        &mut self,
        source: impl Into<LayerSource>,
        options: &LayerOptions,
    ) -> Result<&Layer, LayerError> {
        self.registry.add_layer(&mut self.surface, source, options)
    }

    pub fn get_layer<'a>(&self, lookup: impl Into<LayerLookup<'a>>) -> Option<&Layer> {
        self.registry.get_layer(lookup)
    }

    pub fn get_layers(&self, category: Option<&str>) -> Result<Vec<&Layer>, LayerError> {
        self.registry.get_layers(category)
    }

    pub fn toggle_layer(&mut self, id: LayerId) -> Result<bool, LayerError> {
        self.registry.toggle_layer(&mut self.surface, id)
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer, LayerError> {
        self.registry.remove_layer(&mut self.surface, id)
    }

    pub fn last_modified(&self, category: Category) -> Option<Timestamp> {
        self.registry.last_modified(category)
    }

    pub fn subscribe(
        &mut self,
        filter: ListenerFilter,
        callback: impl FnMut(&CategoryUpdate) + 'static,
    ) -> ListenerId {
        self.registry.subscribe(filter, callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.registry.unsubscribe(id)
    }

    /// Arms a one-shot drop; the next click or tap on terrain calls `callback`.
    pub fn arm_click_drop(&mut self, callback: impl FnOnce(Position) + 'static) {
        self.drop.arm(callback);
    }

    pub fn is_drop_armed(&self) -> bool {
        self.drop.is_armed()
    }

    pub fn cursor(&self) -> CursorStyle {
        self.drop.cursor()
    }

    pub fn handle_pointer_event(&mut self, event: &mut PointerEvent) -> DropOutcome {
        self.drop.handle(event, &self.surface)
    }

    /// Routes every pending surface event and returns those still propagating.
    pub fn pump_events(&mut self) -> Vec<PointerEvent> {
        let mut passed = Vec::new();
        for mut event in self.surface.drain_events() {
            self.handle_pointer_event(&mut event);
            if !event.is_propagation_stopped() {
                passed.push(event);
            }
        }
        passed
    }
}

#[cfg(test)]
mod tests {
    use super::Globe;
    use crate::config::{GlobeConfig, GlobeProps, LayerEntry};
    use crate::interaction::CursorStyle;
    use crate::projection::{Projection, ProjectionSpec};
    use foundation::math::Position;
    use foundation::{LayerId, ManualClock};
    use layers::{Category, Layer, LayerOptions, LayerRegistry, ListenerFilter};
    use pretty_assertions::assert_eq;
    use scene::{HeadlessSurface, PointerEvent, RenderSurface, Renderable, RenderableKind, Touch};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn mount(config: GlobeConfig) -> Globe<HeadlessSurface> {
        let registry = LayerRegistry::with_clock(ManualClock::new(5_000));
        Globe::mount_with_registry(config, registry, |id| HeadlessSurface::new(id, 800.0, 600.0))
            .expect("mount")
    }

    fn names(globe: &Globe<HeadlessSurface>) -> Vec<String> {
        globe
            .registry()
            .layers()
            .iter()
            .map(|l| l.display_name.clone())
            .collect()
    }

    #[test]
    fn mount_adds_background_and_listens() {
        let globe = mount(GlobeConfig::default());
        assert!(globe.is_valid());
        assert!(globe.canvas_id().starts_with("canvas_"));
        assert_eq!(names(&globe), vec!["Blue Marble Background"]);

        let background = globe.get_layer(LayerId(1)).expect("background");
        assert_eq!(background.category(), Some(Category::Background));
        assert!(background.is_enabled());
        assert_eq!(background.min_active_altitude, 0.0);

        assert!(globe.surface().is_listening(scene::PointerEventKind::Click));
        assert!(globe.surface().is_listening(scene::PointerEventKind::TouchEnd));
        assert_eq!(globe.projection(), Projection::ThreeD);
    }

    #[test]
    fn mount_skips_bad_entries_and_keeps_going() {
        let custom = Layer::new(
            "Hurricanes",
            Renderable::new(RenderableKind::Custom {
                name: "hurricanes".to_string(),
            }),
        )
        .with_category(Category::Data);
        let config = GlobeConfig {
            canvas_id: Some("main".to_string()),
            projection: Some(ProjectionSpec::Name("Mercator".to_string())),
            ..GlobeConfig::default()
        }
        .with_layer("not-a-layer")
        .with_layer("compass")
        .with_layer(99usize)
        .with_layer(LayerEntry::Configured {
            layer: serde_json::json!("blue-marble"),
            options: LayerOptions::new().category("nope"),
        })
        .with_layer(custom)
        .with_layer(1usize);

        let globe = mount(config);
        assert_eq!(globe.canvas_id(), "main");
        assert_eq!(
            names(&globe),
            vec!["Blue Marble Background", "Blue Marble", "Hurricanes", "Compass"]
        );
        assert_eq!(globe.projection(), Projection::Mercator);
    }

    #[test]
    fn unparseable_entries_are_skipped_at_mount() {
        let config =
            GlobeConfig::from_json_str(r#"{ "layers": [true, -1, { "nested": 1 }, "compass"] }"#)
                .expect("parse");
        let globe = mount(config);
        assert_eq!(names(&globe), vec!["Blue Marble Background", "Compass"]);
    }

    #[test]
    fn configured_base_url_prefixes_background_image() {
        let background_url = |globe: &Globe<HeadlessSurface>| match &globe
            .get_layer(LayerId(1))
            .expect("background")
            .renderable
            .kind
        {
            RenderableKind::SingleImage { image_url } => image_url.clone(),
            other => panic!("unexpected payload {other:?}"),
        };

        let globe = mount(GlobeConfig::default());
        assert!(
            background_url(&globe)
                .starts_with("https://files.worldwind.arc.nasa.gov/artifactory/web/0.9.0/images/")
        );

        let globe = mount(GlobeConfig {
            base_url: Some("http://localhost:8000/ww/".to_string()),
            ..GlobeConfig::default()
        });
        assert!(background_url(&globe).starts_with("http://localhost:8000/ww/images/BMNG_"));
        assert_eq!(
            globe.registry().catalog().image_base_url(),
            "http://localhost:8000/ww/"
        );
    }

    #[test]
    fn mount_places_camera_only_with_both_coordinates() {
        let globe = mount(GlobeConfig {
            latitude: Some(34.2),
            longitude: Some(-119.2),
            altitude: Some(5e6),
            ..GlobeConfig::default()
        });
        let camera = globe.surface().camera();
        assert_eq!((camera.latitude, camera.longitude, camera.range), (34.2, -119.2, 5e6));
        assert_eq!(globe.surface().animated_moves(), 0);

        let globe = mount(GlobeConfig {
            latitude: Some(34.2),
            ..GlobeConfig::default()
        });
        assert_eq!(globe.surface().camera().latitude, 0.0);
    }

    #[test]
    fn update_props_animates_only_on_change() {
        let mut globe = mount(GlobeConfig {
            latitude: Some(10.0),
            longitude: Some(20.0),
            altitude: Some(1e7),
            ..GlobeConfig::default()
        });
        let same = globe.props();
        assert!(!globe.update_props(same));
        assert_eq!(globe.surface().animated_moves(), 0);

        let next = GlobeProps {
            latitude: Some(-33.9),
            ..same
        };
        assert!(!globe.update_props(next));
        assert_eq!(globe.surface().animated_moves(), 1);
        let camera = globe.surface().camera();
        assert_eq!((camera.latitude, camera.longitude, camera.range), (-33.9, 20.0, 1e7));
        assert_eq!(globe.props(), next);
    }

    #[test]
    fn look_at_keeps_unspecified_coordinates() {
        let mut globe = mount(GlobeConfig::default());
        let range = globe.surface().camera().range;
        let redraws = globe.surface().redraw_count();
        globe.look_at(None, Some(45.0), None);

        let camera = globe.surface().camera();
        assert_eq!((camera.latitude, camera.longitude, camera.range), (0.0, 45.0, range));
        assert_eq!(globe.surface().redraw_count(), redraws + 1);
    }

    #[test]
    fn pump_routes_clicks_to_armed_drop() {
        let mut globe = mount(GlobeConfig::default());
        let drops: Rc<RefCell<Vec<Position>>> = Rc::default();
        let sink = drops.clone();
        globe.arm_click_drop(move |p| sink.borrow_mut().push(p));
        assert_eq!(globe.cursor(), CursorStyle::Crosshair);

        globe.surface_mut().push_event(PointerEvent::click(400.0, 300.0));
        globe.surface_mut().push_event(PointerEvent::click(400.0, 300.0));
        globe
            .surface_mut()
            .push_event(PointerEvent::touch_end(vec![Touch::new(400.0, 300.0)]));

        let passed = globe.pump_events();
        assert_eq!(passed.len(), 2);
        assert_eq!(drops.borrow().len(), 1);
        assert!(!globe.is_drop_armed());
        assert!(globe.pump_events().is_empty());
    }

    #[test]
    fn delegates_reach_the_registry() {
        let mut globe = mount(GlobeConfig::default());
        let seen = Rc::new(RefCell::new(0));
        let counter = seen.clone();
        let listener = globe.subscribe(ListenerFilter::Category(Category::Base), move |_| {
            *counter.borrow_mut() += 1;
        });

        let a = globe
            .add_layer("bing-aerial", &LayerOptions::new())
            .expect("a")
            .unique_id()
            .expect("id");
        let b = globe
            .add_layer("usgs-topo", &LayerOptions::new().enabled(false))
            .expect("b")
            .unique_id()
            .expect("id");
        assert_eq!(globe.toggle_layer(b), Ok(true));
        assert!(!globe.get_layer(a).expect("a").is_enabled());
        assert_eq!(globe.get_layers(Some("base")).expect("base").len(), 2);

        globe.remove_layer(a).expect("remove");
        assert!(globe.unsubscribe(listener));
        assert_eq!(*seen.borrow(), 4);
        assert!(globe.last_modified(Category::Base).is_some());
        assert!(globe.create_layer("stars").is_ok());
    }

    #[test]
    fn projection_round_trip_reuses_initial_model() {
        let mut globe = mount(GlobeConfig::default());
        let initial = globe.surface().globe_model();
        globe.change_projection("North UPS");
        assert_eq!(globe.projection(), Projection::NorthUps);
        globe.change_projection(0usize);
        assert!(Rc::ptr_eq(&initial, &globe.surface().globe_model()));
    }
}
