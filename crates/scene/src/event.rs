#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Click,
    TouchEnd,
    PointerMove,
}

/// One entry of a touch event's changed-touches list, in client pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Touch {
    pub client_x: f64,
    pub client_y: f64,
}

impl Touch {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    kind: PointerEventKind,
    client: Option<(f64, f64)>,
    changed_touches: Vec<Touch>,
    propagation_stopped: bool,
}

impl PointerEvent {
    pub fn click(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Click,
            client: Some((x, y)),
            changed_touches: Vec::new(),
            propagation_stopped: false,
        }
    }

    pub fn touch_end(changed_touches: Vec<Touch>) -> Self {
        Self {
            kind: PointerEventKind::TouchEnd,
            client: None,
            changed_touches,
            propagation_stopped: false,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::PointerMove,
            client: Some((x, y)),
            changed_touches: Vec::new(),
            propagation_stopped: false,
        }
    }

    pub fn kind(&self) -> PointerEventKind {
        self.kind
    }

    pub fn changed_touches(&self) -> &[Touch] {
        &self.changed_touches
    }

    /// Client coordinates of the event; touch events use the first changed touch.
    pub fn screen_point(&self) -> Option<(f64, f64)> {
        match self.kind {
            PointerEventKind::TouchEnd => self
                .changed_touches
                .first()
                .map(|t| (t.client_x, t.client_y)),
            PointerEventKind::Click | PointerEventKind::PointerMove => self.client,
        }
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
