//! Box-drawing state machine
//!
//! Drives rectangle drawing from press/drag/release events in display
//! coordinates. A front-end may show the image scaled down; the machine maps
//! committed rectangles back into original-image coordinates through
//! per-axis scale factors, so session bboxes are never display-scaled.

use crate::session::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DrawState {
    Idle,
    Dragging { anchor: (f32, f32), current: (f32, f32) },
}

/// Explicit idle → dragging machine; release commits at most one rectangle.
#[derive(Debug)]
pub struct BoxDraw {
    /// original width / display width
    scale_x: f32,
    /// original height / display height
    scale_y: f32,
    state: DrawState,
}

impl BoxDraw {
    /// Machine for events already in original-image coordinates.
    pub fn new() -> Self {
        Self::with_scale(1.0, 1.0)
    }

    pub fn with_scale(scale_x: f32, scale_y: f32) -> Self {
        Self {
            scale_x,
            scale_y,
            state: DrawState::Idle,
        }
    }

    /// Machine for a display surface showing the original at a smaller size.
    pub fn for_display(original: (u32, u32), display: (u32, u32)) -> Self {
        // A degenerate display surface falls back to identity scaling
        if display.0 == 0 || display.1 == 0 {
            return Self::new();
        }
        Self::with_scale(
            original.0 as f32 / display.0 as f32,
            original.1 as f32 / display.1 as f32,
        )
    }

    /// Start a drag at the given display position.
    ///
    /// A press during an ongoing drag restarts the gesture.
    pub fn press(&mut self, x: f32, y: f32) {
        self.state = DrawState::Dragging {
            anchor: (x, y),
            current: (x, y),
        };
    }

    /// Update the moving corner. No-op unless dragging.
    pub fn drag(&mut self, x: f32, y: f32) {
        if let DrawState::Dragging { current, .. } = &mut self.state {
            *current = (x, y);
        }
    }

    /// End the gesture, committing the drawn rectangle in original-image
    /// coordinates.
    ///
    /// Returns None for a release without a press or for a zero-area drag;
    /// neither commits anything.
    pub fn release(&mut self, x: f32, y: f32) -> Option<BoundingBox> {
        let DrawState::Dragging { anchor, .. } = self.state else {
            return None;
        };
        self.state = DrawState::Idle;

        let x1 = (anchor.0.min(x) * self.scale_x) as i64;
        let y1 = (anchor.1.min(y) * self.scale_y) as i64;
        let x2 = (anchor.0.max(x) * self.scale_x) as i64;
        let y2 = (anchor.1.max(y) * self.scale_y) as i64;

        let bbox = BoundingBox::new(
            x1.max(0) as u32,
            y1.max(0) as u32,
            (x2 - x1.max(0)).max(0) as u32,
            (y2 - y1.max(0)).max(0) as u32,
        );
        bbox.has_area().then_some(bbox)
    }

    /// The rectangle the ongoing drag would commit, for live preview.
    pub fn pending(&self) -> Option<(f32, f32, f32, f32)> {
        match self.state {
            DrawState::Idle => None,
            DrawState::Dragging { anchor, current } => Some((
                anchor.0.min(current.0),
                anchor.1.min(current.1),
                anchor.0.max(current.0),
                anchor.1.max(current.1),
            )),
        }
    }
}

impl Default for BoxDraw {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_drag_release_commits_rectangle() {
        let mut draw = BoxDraw::new();
        draw.press(10.0, 20.0);
        draw.drag(50.0, 35.0);
        let bbox = draw.release(50.0, 35.0).unwrap();
        assert_eq!(bbox, BoundingBox::new(10, 20, 40, 15));
    }

    #[test]
    fn test_inverted_drag_is_normalized() {
        let mut draw = BoxDraw::new();
        draw.press(50.0, 35.0);
        let bbox = draw.release(10.0, 20.0).unwrap();
        assert_eq!(bbox, BoundingBox::new(10, 20, 40, 15));
    }

    #[test]
    fn test_zero_area_release_commits_nothing() {
        let mut draw = BoxDraw::new();
        draw.press(10.0, 20.0);
        assert!(draw.release(10.0, 40.0).is_none()); // zero width
        draw.press(10.0, 20.0);
        assert!(draw.release(40.0, 20.0).is_none()); // zero height
        draw.press(10.0, 20.0);
        assert!(draw.release(10.0, 20.0).is_none()); // click, no drag
    }

    #[test]
    fn test_release_without_press_is_noop() {
        let mut draw = BoxDraw::new();
        assert!(draw.release(30.0, 30.0).is_none());
    }

    #[test]
    fn test_drag_without_press_is_noop() {
        let mut draw = BoxDraw::new();
        draw.drag(30.0, 30.0);
        assert!(draw.pending().is_none());
    }

    #[test]
    fn test_scale_maps_back_to_original_coordinates() {
        // Original 2000x1000 shown at 1000x500: scale 2.0 on both axes
        let mut draw = BoxDraw::for_display((2000, 1000), (1000, 500));
        draw.press(100.0, 50.0);
        let bbox = draw.release(200.0, 100.0).unwrap();
        assert_eq!(bbox, BoundingBox::new(200, 100, 200, 100));
    }

    #[test]
    fn test_degenerate_display_uses_identity_scale() {
        let mut draw = BoxDraw::for_display((2000, 1000), (0, 0));
        draw.press(0.0, 0.0);
        let bbox = draw.release(10.0, 10.0).unwrap();
        assert_eq!(bbox, BoundingBox::new(0, 0, 10, 10));
    }

    #[test]
    fn test_release_resets_to_idle() {
        let mut draw = BoxDraw::new();
        draw.press(0.0, 0.0);
        draw.release(10.0, 10.0);
        assert!(draw.pending().is_none());
        assert!(draw.release(20.0, 20.0).is_none());
    }

    #[test]
    fn test_pending_tracks_drag() {
        let mut draw = BoxDraw::new();
        draw.press(10.0, 10.0);
        draw.drag(4.0, 30.0);
        assert_eq!(draw.pending(), Some((4.0, 10.0, 10.0, 30.0)));
    }
}
