use jardin_geometry::{InnerSpace, Point2, Vector2, Zero};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

/// One finger as seen in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Touch {
    pub id: u64,
    pub position: Point2<f32>,
    /// Movement since the previous frame, in pixels.
    pub delta: Vector2<f32>,
    pub phase: TouchPhase,
    /// Set when a UI element is consuming this touch.
    pub over_ui: bool,
}

impl Touch {
    pub fn new(id: u64, position: Point2<f32>, phase: TouchPhase) -> Self {
        Self {
            id,
            position,
            delta: Vector2::zero(),
            phase,
            over_ui: false,
        }
    }

    pub fn with_delta(mut self, delta: Vector2<f32>) -> Self {
        self.delta = delta;
        self
    }

    pub fn over_ui(mut self) -> Self {
        self.over_ui = true;
        self
    }

    pub fn previous_position(&self) -> Point2<f32> {
        self.position - self.delta
    }

    pub fn travel(&self) -> f32 {
        self.delta.magnitude()
    }
}

/// Immutable input snapshot for one rendered frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TouchFrame {
    /// Seconds since the session started.
    pub time: f64,
    pub delta_time: f64,
    pub touches: Vec<Touch>,
}

impl TouchFrame {
    pub fn new(time: f64, delta_time: f64) -> Self {
        Self {
            time,
            delta_time,
            touches: Vec::new(),
        }
    }

    pub fn with_touch(mut self, touch: Touch) -> Self {
        self.touches.push(touch);
        self
    }

    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }
}
