use crate::surface::{DrawingSurface, Point};

/// Input events after normalizing mouse and touch to canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Mouse button pressed or first touch started
    Down(Point),
    /// Pointer or first touch moved
    Move(Point),
    /// Button released or touch ended
    Up,
    /// Pointer left the canvas
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StrokeState {
    Idle,
    Drawing { last: Point },
}

/// Turns pointer input into round-capped strokes on a surface
#[derive(Debug, Clone)]
pub struct StrokeCapture {
    state: StrokeState,
    line_width: f64,
}

impl StrokeCapture {
    pub fn new(line_width: f64) -> Self {
        Self {
            state: StrokeState::Idle,
            line_width,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    pub fn handle<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, input: PointerInput) {
        match input {
            PointerInput::Down(p) => self.begin(surface, p),
            PointerInput::Move(p) => self.extend(surface, p),
            PointerInput::Up | PointerInput::Leave => self.end(),
        }
    }

    /// Start a stroke; a press without movement still leaves a dot
    pub fn begin<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, point: Point) {
        surface.fill_dot(point, self.line_width / 2.0);
        self.state = StrokeState::Drawing { last: point };
    }

    pub fn extend<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, point: Point) {
        let StrokeState::Drawing { last } = self.state else {
            return;
        };

        surface.stroke_segment(last, point, self.line_width);
        // Cap the joint so slow moves and sharp turns stay gap-free
        surface.fill_dot(point, self.line_width / 2.0);
        self.state = StrokeState::Drawing { last: point };
    }

    pub fn end(&mut self) {
        self.state = StrokeState::Idle;
    }

    /// Wipe the surface back to the background and drop any open stroke
    pub fn clear<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        self.end();
        surface.fill_background();
    }
}
