use crate::models::NoteId;
use crate::util::make_note_id;

/// Visible, scrollable rectangle of the host surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// Environment queries the engine needs from whatever renders it.
pub(crate) trait Host {
    fn viewport(&self) -> Viewport;
    fn now_ms(&self) -> i64;
    fn now_iso(&self) -> String;
    /// Uniform in `[0, 1)`.
    fn random_unit(&self) -> f64;
}

/// Counters shared by every note on a board.
#[derive(Clone, Debug)]
pub(crate) struct EngineContext {
    page_id: String,
    next_z: i64,
    next_seq: u64,
}

impl EngineContext {
    pub fn new(page_id: String, base_z_index: i64) -> Self {
        Self {
            page_id,
            next_z: base_z_index,
            next_seq: 0,
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// Strictly greater than every value handed out before.
    pub fn next_z_index(&mut self) -> i64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    pub fn next_note_id(&mut self, now_ms: i64) -> NoteId {
        let id = make_note_id(now_ms, self.next_seq);
        self.next_seq += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_index_strictly_increasing() {
        let mut ctx = EngineContext::new("page_1".to_string(), 1000);
        let a = ctx.next_z_index();
        let b = ctx.next_z_index();
        assert_eq!(a, 1000);
        assert!(b > a);
    }

    #[test]
    fn test_note_ids_unique_within_same_millisecond() {
        let mut ctx = EngineContext::new("page_1".to_string(), 1000);
        let a = ctx.next_note_id(5);
        let b = ctx.next_note_id(5);
        assert_eq!(a, "note_5_0");
        assert_eq!(b, "note_5_1");
    }
}
