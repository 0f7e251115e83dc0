pub mod classifier;

pub use classifier::GestureClassifier;

use crate::geometry::Point;

/// Where a pointer sample sits in the press-move-release cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The stream was interrupted (focus loss, system gesture, …)
    Cancel,
}

/// One sample from the presentation layer's raw touch stream.
/// `at` is milliseconds on the presentation layer's monotonic clock — the
/// classifier never reads a wall clock of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub at: u64,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, at: u64, position: Point) -> Self {
        PointerEvent {
            phase,
            at,
            position,
        }
    }
}

/// A discrete intent recognized from the stream. Drag and swipe variants
/// carry live geometry so the presentation layer can move the element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Tap,
    DoubleTap,
    DragStart,
    DragMove { translation: Point, absolute: Point },
    DragEnd { translation: Point, absolute: Point },
    SwipeMove { translation_x: f32 },
    SwipeEnd { translation_x: f32 },
    /// Nothing was recognized; any partial visual offset should reset
    Cancel,
}

/// Which gestures an element kind participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureCaps {
    pub double_tap: bool,
    pub drag: bool,
    pub swipe: bool,
}

impl GestureCaps {
    /// Task rows: tap to edit, long-press drag to recategorize,
    /// horizontal swipe to delete
    pub fn task_row() -> GestureCaps {
        GestureCaps {
            double_tap: false,
            drag: true,
            swipe: true,
        }
    }

    /// Category buttons: tap to select, double tap to rename,
    /// long-press drag to reorder
    pub fn category_button() -> GestureCaps {
        GestureCaps {
            double_tap: true,
            drag: true,
            swipe: false,
        }
    }
}
