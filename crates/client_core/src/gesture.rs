//! Drag-gesture interpretation for the interactive card.
//!
//! The interpreter is toolkit-agnostic: hosts feed it pointer positions and
//! render whatever [`DragFeedback`] and [`GestureOutcome`] values it returns.

use std::{fmt, ops::Sub, rc::Rc};

use serde::Deserialize;

pub const DEFAULT_SWIPE_THRESHOLD: f32 = 100.0;
pub const DEFAULT_HINT_THRESHOLD: f32 = 50.0;
pub const DEFAULT_ROTATION_FACTOR: f32 = 0.1;
pub const DEFAULT_FADE_DISTANCE: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Distance a drag must exceed on its dominant axis to count as a swipe.
    pub swipe_threshold: f32,
    /// Horizontal distance after which a left/right hint is shown.
    pub hint_threshold: f32,
    /// Degrees of rotation per unit of horizontal offset.
    pub rotation_factor: f32,
    /// Horizontal distance at which the card is fully faded.
    pub fade_distance: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            hint_threshold: DEFAULT_HINT_THRESHOLD,
            rotation_factor: DEFAULT_ROTATION_FACTOR,
            fade_distance: DEFAULT_FADE_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeHint {
    Left,
    Right,
}

/// Visual parameters for the card while it is being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFeedback {
    pub offset: Point,
    pub rotation_deg: f32,
    pub fade: f32,
    pub hint: Option<SwipeHint>,
}

impl DragFeedback {
    /// Untransformed card: no translation, no rotation, fully opaque.
    pub const IDENTITY: Self = Self {
        offset: Point::ZERO,
        rotation_deg: 0.0,
        fade: 1.0,
        hint: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Swiped(SwipeDirection),
    /// The drag did not qualify; the card snaps back to [`DragFeedback::IDENTITY`].
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSignal {
    Feedback(DragFeedback),
    Outcome(GestureOutcome),
}

pub type ExemptRegion = Rc<dyn Fn(Point) -> bool>;

#[derive(Debug, Clone, Copy)]
struct GestureSession {
    origin: Point,
    offset: Point,
}

pub struct GestureInterpreter {
    config: GestureConfig,
    exempt: Option<ExemptRegion>,
    session: Option<GestureSession>,
    disposed: bool,
}

impl fmt::Debug for GestureInterpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureInterpreter")
            .field("config", &self.config)
            .field("has_exempt_region", &self.exempt.is_some())
            .field("session", &self.session)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            exempt: None,
            session: None,
            disposed: false,
        }
    }

    pub fn with_exempt_region(mut self, exempt: ExemptRegion) -> Self {
        self.exempt = Some(exempt);
        self
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Current drag offset, or `None` when no drag is in progress.
    pub fn offset(&self) -> Option<Point> {
        self.session.map(|session| session.offset)
    }

    /// Starts a drag at `origin`. Returns whether a session was opened.
    pub fn begin(&mut self, origin: Point) -> bool {
        if self.disposed || self.session.is_some() {
            return false;
        }
        if self.exempt.as_ref().is_some_and(|exempt| exempt(origin)) {
            return false;
        }
        self.session = Some(GestureSession {
            origin,
            offset: Point::ZERO,
        });
        true
    }

    pub fn update(&mut self, current: Point) -> Option<DragFeedback> {
        if self.disposed {
            return None;
        }
        let session = self.session.as_mut()?;
        session.offset = current - session.origin;
        Some(feedback_for(&self.config, session.offset))
    }

    /// Finishes the drag and classifies it. Always clears the session.
    pub fn end(&mut self) -> Option<GestureOutcome> {
        if self.disposed {
            return None;
        }
        let session = self.session.take()?;
        Some(classify(&self.config, session.offset))
    }

    /// Abandons a drag without classifying it; the card snaps back.
    pub fn cancel(&mut self) -> Option<GestureOutcome> {
        if self.disposed {
            return None;
        }
        self.session.take().map(|_| GestureOutcome::Released)
    }

    /// Resolves a swipe without pointer input (buttons, keyboard).
    pub fn trigger(&mut self, direction: SwipeDirection) -> Option<GestureOutcome> {
        if self.disposed {
            return None;
        }
        self.session = None;
        Some(GestureOutcome::Swiped(direction))
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<GestureSignal> {
        match event {
            PointerEvent::Down(origin) => {
                self.begin(origin);
                None
            }
            PointerEvent::Move(current) => self.update(current).map(GestureSignal::Feedback),
            PointerEvent::Up => self.end().map(GestureSignal::Outcome),
            PointerEvent::Cancel => self.cancel().map(GestureSignal::Outcome),
        }
    }

    /// Detaches the interpreter. Any in-flight drag is discarded silently and
    /// every later call is a no-op.
    pub fn dispose(&mut self) {
        self.session = None;
        self.exempt = None;
        self.disposed = true;
    }
}

pub fn feedback_for(config: &GestureConfig, offset: Point) -> DragFeedback {
    let fade = if config.fade_distance > 0.0 {
        (1.0 - offset.x.abs() / config.fade_distance).max(0.0)
    } else {
        0.0
    };
    let hint = if offset.x > config.hint_threshold {
        Some(SwipeHint::Right)
    } else if offset.x < -config.hint_threshold {
        Some(SwipeHint::Left)
    } else {
        None
    };
    DragFeedback {
        offset,
        rotation_deg: offset.x * config.rotation_factor,
        fade,
        hint,
    }
}

/// Strict inequalities throughout: equal magnitudes on both axes never swipe.
pub fn classify(config: &GestureConfig, offset: Point) -> GestureOutcome {
    let abs_x = offset.x.abs();
    let abs_y = offset.y.abs();
    let threshold = config.swipe_threshold;

    if abs_x > threshold && abs_x > abs_y {
        if offset.x > 0.0 {
            GestureOutcome::Swiped(SwipeDirection::Right)
        } else {
            GestureOutcome::Swiped(SwipeDirection::Left)
        }
    } else if offset.y < -threshold && abs_y > abs_x {
        GestureOutcome::Swiped(SwipeDirection::Up)
    } else {
        GestureOutcome::Released
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
