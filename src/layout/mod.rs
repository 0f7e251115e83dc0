use indexmap::IndexMap;

use crate::geometry::{Point, Rect};
use crate::model::DropConfig;

/// Screen rectangles for category buttons, keyed by category id and
/// reported by the presentation layer whenever a button is (re)measured.
/// Pure lookup table: insertion order doubles as hit-test precedence.
/// Entries go stale the moment buttons move, so the presentation layer
/// must re-report after reorders and rotations; the resolver degrades to
/// "no target" when an entry is missing.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    rects: IndexMap<String, Rect>,
}

impl LayoutRegistry {
    /// Idempotent upsert
    pub fn record(&mut self, category_id: impl Into<String>, rect: Rect) {
        self.rects.insert(category_id.into(), rect);
    }

    pub fn get(&self, category_id: &str) -> Option<Rect> {
        self.rects.get(category_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rect)> {
        self.rects.iter().map(|(id, rect)| (id.as_str(), *rect))
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Resolves a live drag position to the category button under it, and
/// category drags to reorder slots.
#[derive(Debug, Clone, Copy)]
pub struct DropResolver {
    /// Correction added to recorded rects for container padding
    origin: Point,
    /// Extra hit area below each rect's bottom edge
    bottom_tolerance: f32,
    row_origin_x: f32,
    slot_width: f32,
}

impl DropResolver {
    pub fn new(cfg: &DropConfig) -> DropResolver {
        DropResolver {
            origin: Point::new(cfg.origin_x, cfg.origin_y),
            bottom_tolerance: cfg.bottom_tolerance,
            row_origin_x: cfg.row_origin_x,
            slot_width: cfg.slot_width,
        }
    }

    /// The first registered rect (in registry order) containing the point,
    /// unless that hit is the dragged task's current category — dropping a
    /// task where it already lives is "no target".
    pub fn resolve(
        &self,
        registry: &LayoutRegistry,
        point: Point,
        current_category: &str,
    ) -> Option<String> {
        let hit = registry
            .iter()
            .find(|(_, rect)| self.hit_region(*rect).contains(point))
            .map(|(id, _)| id.to_string())?;
        if hit == current_category { None } else { Some(hit) }
    }

    /// Where a fly-to-target animation should land: the middle of the
    /// category's hit region
    pub fn target_point(&self, registry: &LayoutRegistry, category_id: &str) -> Option<Point> {
        let rect = registry.get(category_id)?;
        let adjusted = rect.translated(self.origin.x, self.origin.y);
        Some(Point::new(
            adjusted.x + adjusted.width / 2.0,
            adjusted.y + adjusted.height + self.bottom_tolerance / 2.0,
        ))
    }

    /// Reorder slot for a category drag released at `absolute_x`: nearest
    /// nominal button slot, clamped to the row
    pub fn reorder_index(&self, absolute_x: f32, category_count: usize) -> usize {
        if category_count == 0 {
            return 0;
        }
        let raw = ((absolute_x - self.row_origin_x) / self.slot_width).round();
        (raw.max(0.0) as usize).min(category_count - 1)
    }

    fn hit_region(&self, rect: Rect) -> Rect {
        let mut adjusted = rect.translated(self.origin.x, self.origin.y);
        adjusted.height += self.bottom_tolerance;
        adjusted
    }
}
