/// Tracks the last seen viewport width and turns width changes into a scale
/// factor for horizontal positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ViewportRescaler {
    previous_width: f64,
}

impl ViewportRescaler {
    pub fn new(width: f64) -> Self {
        Self {
            previous_width: width,
        }
    }

    pub fn previous_width(&self) -> f64 {
        self.previous_width
    }

    /// Scale to apply to every x coordinate, or `None` when nothing moves.
    /// The new width always becomes the next baseline when it is usable.
    pub fn rescale(&mut self, new_width: f64) -> Option<f64> {
        if new_width <= 0.0 {
            return None;
        }
        let previous = std::mem::replace(&mut self.previous_width, new_width);
        if previous <= 0.0 || previous == new_width {
            return None;
        }
        Some(new_width / previous)
    }
}
