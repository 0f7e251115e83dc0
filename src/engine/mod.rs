//! The interaction engine: raw pointer samples in, store mutations and
//! presentation effects out.
//!
//! The presentation layer owns the clock, the screen, and the raw input
//! stream. Each frame it records where the category buttons landed, feeds
//! pointer samples tagged with the element they started on, ticks the
//! engine, and reports animation completions. Everything that actually
//! changes the dataset funnels through the [`Coordinator`] inside.

pub mod coordinator;

pub use coordinator::{
    AnimKind, AnimProp, Coordinator, Effect, ElementId, Mutation, SaveError,
};

use std::collections::HashMap;

use crate::geometry::Rect;
use crate::gesture::{GestureCaps, GestureClassifier, GestureEvent, PointerEvent};
use crate::layout::LayoutRegistry;
use crate::model::{Config, GestureConfig, Task};
use crate::store::Store;

/// What one engine call produced: the recognized gestures (for live visual
/// offsets) and the resulting effects (for everything else)
#[derive(Debug, Default)]
pub struct Output {
    pub gestures: Vec<(ElementId, GestureEvent)>,
    pub effects: Vec<Effect>,
}

impl Output {
    fn is_empty(&self) -> bool {
        self.gestures.is_empty() && self.effects.is_empty()
    }
}

pub struct Engine {
    coordinator: Coordinator,
    layouts: LayoutRegistry,
    classifiers: HashMap<ElementId, GestureClassifier>,
    gesture_cfg: GestureConfig,
}

impl Engine {
    pub fn new(store: Store, cfg: Config) -> Engine {
        let gesture_cfg = cfg.gestures.clone();
        Engine {
            coordinator: Coordinator::new(store, cfg),
            layouts: LayoutRegistry::default(),
            classifiers: HashMap::new(),
            gesture_cfg,
        }
    }

    pub fn store(&self) -> &Store {
        self.coordinator.store()
    }

    pub fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    /// Record where a category button landed this frame. Layouts feed the
    /// drop resolver, so they must be current before a drag releases.
    pub fn record_layout(&mut self, category_id: &str, rect: Rect) {
        self.layouts.record(category_id, rect);
    }

    /// Feed one pointer sample attributed to the element it started on
    pub fn pointer(&mut self, element: &ElementId, ev: PointerEvent) -> Output {
        let caps = match element {
            ElementId::Task(_) => GestureCaps::task_row(),
            ElementId::Category(_) => GestureCaps::category_button(),
        };
        let classifier = self
            .classifiers
            .entry(element.clone())
            .or_insert_with(|| GestureClassifier::new(caps, self.gesture_cfg.clone()));
        let gestures = classifier.on_pointer(ev);
        if classifier.is_idle() {
            self.classifiers.remove(element);
        }
        self.route(vec![(element.clone(), gestures)])
    }

    /// Advance the gesture clock. Drives long-press activation and the
    /// deferred single tap behind the double-tap window.
    pub fn tick(&mut self, now: u64) -> Output {
        let fired: Vec<(ElementId, Vec<GestureEvent>)> = self
            .classifiers
            .iter_mut()
            .map(|(element, classifier)| (element.clone(), classifier.on_tick(now)))
            .collect();
        self.classifiers.retain(|_, c| !c.is_idle());
        self.route(fired)
    }

    /// One property of a previously requested animation finished
    pub fn animation_complete(&mut self, token: u64, prop: AnimProp) -> Vec<Effect> {
        self.coordinator.on_animation_complete(token, prop)
    }

    pub fn checkbox_toggled(&mut self, task_id: &str, checked: bool) -> Vec<Effect> {
        self.coordinator.on_checkbox_toggled(task_id, checked)
    }

    pub fn save_task(&mut self, draft: Task) -> Result<Vec<Effect>, SaveError> {
        self.coordinator.on_task_saved(draft)
    }

    pub fn rename_confirmed(&mut self, category_id: &str, input: &str) -> Vec<Effect> {
        self.coordinator.on_rename_confirmed(category_id, input)
    }

    fn route(&mut self, fired: Vec<(ElementId, Vec<GestureEvent>)>) -> Output {
        let mut out = Output::default();
        for (element, gestures) in fired {
            for gesture in gestures {
                let effects = match &element {
                    ElementId::Task(id) => {
                        self.coordinator.on_task_gesture(id, gesture, &self.layouts)
                    }
                    ElementId::Category(id) => {
                        self.coordinator
                            .on_category_gesture(id, gesture, &self.layouts)
                    }
                };
                out.effects.extend(effects);
                out.gestures.push((element.clone(), gesture));
            }
        }
        if !out.is_empty() {
            tracing::trace!(gestures = out.gestures.len(), effects = out.effects.len(), "engine output");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::gesture::PointerPhase;
    use crate::store::{DATA_KEY, MemKv, Snapshot};
    use pretty_assertions::assert_eq;

    fn engine() -> Engine {
        let kv = MemKv::default();
        kv.preload(DATA_KEY, &Snapshot::default_data().encode().unwrap());
        Engine::new(Store::open(kv), Config::default())
    }

    fn sample(phase: PointerPhase, at: u64, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(phase, at, Point::new(x, y))
    }

    #[test]
    fn tap_sample_pair_opens_the_editor() {
        let mut e = engine();
        let el = ElementId::Task("t1".into());
        assert!(e.pointer(&el, sample(PointerPhase::Down, 0, 50.0, 200.0)).is_empty());
        let out = e.pointer(&el, sample(PointerPhase::Up, 100, 52.0, 201.0));
        assert_eq!(out.gestures, [(el, GestureEvent::Tap)]);
        assert!(matches!(out.effects[..], [Effect::EditRequested(_)]));
    }

    #[test]
    fn long_press_drag_drop_commits_through_the_engine() {
        let mut e = engine();
        for (id, x) in [("c1", 0.0), ("c2", 70.0), ("c3", 140.0), ("c4", 210.0)] {
            e.record_layout(id, Rect::new(x, 0.0, 60.0, 30.0));
        }
        let el = ElementId::Task("t1".into());

        e.pointer(&el, sample(PointerPhase::Down, 0, 50.0, 200.0));
        // the hold matures via the tick clock
        let out = e.tick(1000);
        assert_eq!(out.gestures, [(el.clone(), GestureEvent::DragStart)]);

        let out = e.pointer(&el, sample(PointerPhase::Move, 1100, 120.0, 100.0));
        assert!(out
            .effects
            .contains(&Effect::DragHighlight(Some("c2".into()))));

        // release inside c2's drop region, then let the flight settle
        let out = e.pointer(&el, sample(PointerPhase::Up, 1200, 120.0, 100.0));
        let token = out
            .effects
            .iter()
            .find_map(|eff| match eff {
                Effect::Animate { token, kind, .. } if matches!(kind, AnimKind::FlyTo { .. }) => {
                    Some(*token)
                }
                _ => None,
            })
            .expect("fly animation");
        assert_eq!(e.store().task("t1").unwrap().category_id, "c1");

        let effects = e.animation_complete(token, AnimProp::TranslateX);
        assert!(effects.contains(&Effect::Committed(Mutation::Moved {
            task_id: "t1".into(),
            category_id: "c2".into(),
        })));
        assert_eq!(e.store().task("t1").unwrap().category_id, "c2");
    }

    #[test]
    fn deferred_tap_on_a_category_selects_it_after_the_window() {
        let mut e = engine();
        let el = ElementId::Category("c2".into());
        e.pointer(&el, sample(PointerPhase::Down, 0, 100.0, 100.0));
        let out = e.pointer(&el, sample(PointerPhase::Up, 120, 100.0, 100.0));
        // tap is parked while a second tap could still arrive
        assert!(out.is_empty());

        assert!(e.tick(200).is_empty());
        let out = e.tick(400);
        assert_eq!(out.gestures, [(el, GestureEvent::Tap)]);
        assert_eq!(out.effects, [Effect::CategorySelected("c2".into())]);
    }

    #[test]
    fn idle_classifiers_are_pruned() {
        let mut e = engine();
        let el = ElementId::Task("t1".into());
        e.pointer(&el, sample(PointerPhase::Down, 0, 50.0, 200.0));
        assert_eq!(e.classifiers.len(), 1);
        e.pointer(&el, sample(PointerPhase::Up, 100, 50.0, 200.0));
        assert!(e.classifiers.is_empty());
    }
}
