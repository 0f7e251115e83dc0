use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::geometry::Point;
use crate::gesture::GestureEvent;
use crate::layout::{DropResolver, LayoutRegistry};
use crate::model::{Category, Config, Task};
use crate::reminder;
use crate::store::Store;

/// An interactive element the presentation layer reports gestures for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementId {
    Task(String),
    Category(String),
}

/// How an animation leaves the element once it settles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimKind {
    /// Fly toward the resolved target's screen position, shrinking away
    FlyTo { target: Point },
    /// Spring back to neutral transform and opacity
    Reset,
    /// Slide off the edge of the screen, following the swipe direction
    Exit { to_right: bool },
}

/// One animated property of a compound animation. Horizontal position is
/// the authoritative one: only its completion commits a pending mutation,
/// so the other properties finishing in any order cannot double-fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimProp {
    TranslateX,
    TranslateY,
    Scale,
    Opacity,
}

/// A completed store mutation, reported outward after it lands
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Saved(Task),
    Moved { task_id: String, category_id: String },
    Deleted { task_id: String },
    Reordered { from: usize, to: usize },
    Renamed { category_id: String, name: String },
}

/// Instructions back to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Single tap on a category button: show that category's tasks
    CategorySelected(String),
    /// Single tap on a task row: hand the task to the external editor
    EditRequested(Task),
    /// Live drop-target highlight while a task drag is in flight
    DragHighlight(Option<String>),
    /// Double tap on a renameable category: show the text prompt
    RenamePromptRequested(Category),
    /// Double tap on a reserved category: user-visible notice, no prompt
    RenameRejected { category_id: String, reason: String },
    /// Run an animation; report each property's completion back with the token
    Animate {
        element: ElementId,
        kind: AnimKind,
        duration_ms: u64,
        token: u64,
    },
    /// A store mutation landed
    Committed(Mutation),
    /// A saved task wants a reminder scheduled (external collaborator)
    ScheduleReminder {
        title: String,
        body: String,
        trigger_at: DateTime<Utc>,
    },
}

/// Error type for coordinator-level rejections
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("a task needs a title before it can be saved")]
    EmptyTitle,
}

/// The store mutation parked behind an in-flight animation
#[derive(Debug, Clone, PartialEq)]
enum PendingMutation {
    Move { task_id: String, category_id: String },
    Delete { task_id: String },
    Reorder { from: usize, to: usize },
}

#[derive(Debug)]
struct PendingCommit {
    token: u64,
    mutation: PendingMutation,
}

/// Orchestrates the commit protocol: each completed gesture mutates the
/// store at most once, and a mutation that is visually "in flight" (the
/// fly-to-target animation) only lands when the animation settles. A
/// gesture that resolves to nothing animates back and leaves the store
/// untouched. Pending commits are keyed per element, so a gesture on one
/// element cannot discard another element's in-flight commit.
#[derive(Debug)]
pub struct Coordinator {
    store: Store,
    resolver: DropResolver,
    cfg: Config,
    pending: HashMap<ElementId, PendingCommit>,
    next_token: u64,
}

impl Coordinator {
    pub fn new(store: Store, cfg: Config) -> Coordinator {
        Coordinator {
            store,
            resolver: DropResolver::new(&cfg.drop),
            cfg,
            pending: HashMap::new(),
            next_token: 1,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn resolver(&self) -> &DropResolver {
        &self.resolver
    }

    /// A recognized gesture on a task row
    pub fn on_task_gesture(
        &mut self,
        task_id: &str,
        event: GestureEvent,
        layouts: &LayoutRegistry,
    ) -> Vec<Effect> {
        match event {
            GestureEvent::Tap => match self.store.task(task_id) {
                Some(task) => vec![Effect::EditRequested(task.clone())],
                None => Vec::new(),
            },
            GestureEvent::DragStart => Vec::new(),
            GestureEvent::DragMove { absolute, .. } => {
                let current = self.task_category(task_id);
                vec![Effect::DragHighlight(self.resolver.resolve(
                    layouts,
                    absolute,
                    &current,
                ))]
            }
            GestureEvent::DragEnd { absolute, .. } => self.task_drag_end(task_id, absolute, layouts),
            GestureEvent::SwipeMove { .. } => Vec::new(),
            GestureEvent::SwipeEnd { translation_x } => self.task_swipe_end(task_id, translation_x),
            GestureEvent::DoubleTap => Vec::new(),
            GestureEvent::Cancel => {
                let element = ElementId::Task(task_id.to_string());
                self.pending.remove(&element);
                vec![self.animate(element, AnimKind::Reset, self.cfg.animation.reset_ms)]
            }
        }
    }

    /// A recognized gesture on a category button
    pub fn on_category_gesture(
        &mut self,
        category_id: &str,
        event: GestureEvent,
        layouts: &LayoutRegistry,
    ) -> Vec<Effect> {
        match event {
            GestureEvent::Tap => vec![Effect::CategorySelected(category_id.to_string())],
            GestureEvent::DoubleTap => self.category_rename_requested(category_id),
            GestureEvent::DragEnd { absolute, .. } => {
                self.category_drag_end(category_id, absolute, layouts)
            }
            GestureEvent::Cancel => {
                let element = ElementId::Category(category_id.to_string());
                self.pending.remove(&element);
                vec![self.animate(element, AnimKind::Reset, self.cfg.animation.reset_ms)]
            }
            // live category drag movement is purely visual
            _ => Vec::new(),
        }
    }

    /// A property of an animation scheduled by this coordinator finished.
    /// Only the authoritative horizontal-position completion for a parked
    /// gesture commits; committing removes the entry, so repeated or stale
    /// completions find nothing and are ignored.
    pub fn on_animation_complete(&mut self, token: u64, prop: AnimProp) -> Vec<Effect> {
        if prop != AnimProp::TranslateX {
            return Vec::new();
        }
        let Some(element) = self
            .pending
            .iter()
            .find(|(_, p)| p.token == token)
            .map(|(e, _)| e.clone())
        else {
            return Vec::new();
        };
        match self.pending.remove(&element) {
            Some(pending) => self.commit(pending.mutation),
            None => Vec::new(),
        }
    }

    /// Direct checkbox toggle — not a gesture, no animation gate.
    /// Checking moves the task to "Completed", unchecking back to "ToDo",
    /// keeping `checked` and the category in lockstep.
    pub fn on_checkbox_toggled(&mut self, task_id: &str, checked: bool) -> Vec<Effect> {
        let target_name = if checked { "Completed" } else { "ToDo" };
        let Some(target) = self.store.category_named(target_name).map(|c| c.id.clone()) else {
            // the reserved categories exist for the dataset's lifetime;
            // losing one means the data is foreign — do nothing
            warn!(target_name, "reserved category missing, ignoring toggle");
            return Vec::new();
        };
        let Some(mut task) = self.store.task(task_id).cloned() else {
            return Vec::new();
        };
        task.checked = checked;
        task.category_id = target.clone();
        self.store.update_task(task);
        debug!(task_id, checked, target = %target, "checkbox toggle");
        vec![Effect::Committed(Mutation::Moved {
            task_id: task_id.to_string(),
            category_id: target,
        })]
    }

    /// Save callback from the editor collaborator. Refuses an empty title
    /// (the editor should have enforced it already), clears an orphaned
    /// reminder lead, and upserts — the same path covers new drafts and
    /// edits of existing tasks.
    pub fn on_task_saved(&mut self, mut draft: Task) -> Result<Vec<Effect>, SaveError> {
        if draft.title.trim().is_empty() {
            return Err(SaveError::EmptyTitle);
        }
        draft.normalize_reminder();
        let saved = self.store.update_task(draft);

        let mut effects = Vec::new();
        if let Some(trigger_at) = reminder::trigger_at(&saved) {
            effects.push(Effect::ScheduleReminder {
                title: saved.title.clone(),
                body: saved.description.clone().unwrap_or_default(),
                trigger_at,
            });
        }
        effects.push(Effect::Committed(Mutation::Saved(saved)));
        Ok(effects)
    }

    /// Confirmed text from the rename prompt. Empty input cancels; the
    /// reserved-name check already happened before the prompt was shown,
    /// but the store re-checks anyway.
    pub fn on_rename_confirmed(&mut self, category_id: &str, input: &str) -> Vec<Effect> {
        let name = input.trim();
        if name.is_empty() {
            return Vec::new();
        }
        match self.store.rename_category(category_id, name) {
            Ok(()) => vec![Effect::Committed(Mutation::Renamed {
                category_id: category_id.to_string(),
                name: name.to_string(),
            })],
            Err(err) => vec![Effect::RenameRejected {
                category_id: category_id.to_string(),
                reason: err.to_string(),
            }],
        }
    }

    fn task_drag_end(
        &mut self,
        task_id: &str,
        absolute: Point,
        layouts: &LayoutRegistry,
    ) -> Vec<Effect> {
        let element = ElementId::Task(task_id.to_string());
        let current = self.task_category(task_id);
        let resolved = self.resolver.resolve(layouts, absolute, &current);

        let mut effects = vec![Effect::DragHighlight(None)];
        match resolved.and_then(|id| Some((self.resolver.target_point(layouts, &id)?, id))) {
            Some((target, category_id)) => {
                // park the move behind the fly-to animation; the store is
                // untouched until the animation settles
                let token = self.park(
                    element.clone(),
                    PendingMutation::Move {
                        task_id: task_id.to_string(),
                        category_id,
                    },
                );
                effects.push(Effect::Animate {
                    element,
                    kind: AnimKind::FlyTo { target },
                    duration_ms: self.cfg.animation.fly_ms,
                    token,
                });
            }
            None => {
                self.pending.remove(&element);
                effects.push(self.animate(element, AnimKind::Reset, self.cfg.animation.reset_ms));
            }
        }
        effects
    }

    fn task_swipe_end(&mut self, task_id: &str, translation_x: f32) -> Vec<Effect> {
        let element = ElementId::Task(task_id.to_string());
        if translation_x.abs() > self.cfg.gestures.swipe_delete {
            let token = self.park(
                element.clone(),
                PendingMutation::Delete {
                    task_id: task_id.to_string(),
                },
            );
            vec![Effect::Animate {
                element,
                kind: AnimKind::Exit {
                    to_right: translation_x > 0.0,
                },
                duration_ms: self.cfg.animation.exit_ms,
                token,
            }]
        } else {
            self.pending.remove(&element);
            vec![self.animate(element, AnimKind::Reset, self.cfg.animation.reset_ms)]
        }
    }

    fn category_rename_requested(&mut self, category_id: &str) -> Vec<Effect> {
        let Some(category) = self.store.category(category_id).cloned() else {
            return Vec::new();
        };
        if category.is_reserved() {
            return vec![Effect::RenameRejected {
                category_id: category.id,
                reason: format!("\"{}\" is a reserved category and cannot be renamed", category.name),
            }];
        }
        vec![Effect::RenamePromptRequested(category)]
    }

    fn category_drag_end(
        &mut self,
        category_id: &str,
        absolute: Point,
        layouts: &LayoutRegistry,
    ) -> Vec<Effect> {
        let element = ElementId::Category(category_id.to_string());
        let Some(from) = self.store.category_index(category_id) else {
            self.pending.remove(&element);
            return vec![self.animate(element, AnimKind::Reset, self.cfg.animation.reset_ms)];
        };
        let to = self
            .resolver
            .reorder_index(absolute.x, self.store.categories().len());
        if to == from {
            self.pending.remove(&element);
            return vec![self.animate(element, AnimKind::Reset, self.cfg.animation.reset_ms)];
        }

        // fly toward the destination slot (if we know where it is), and
        // commit the reorder once the flight settles
        let target = self
            .store
            .categories()
            .get(to)
            .and_then(|c| self.resolver.target_point(layouts, &c.id))
            .unwrap_or(absolute);
        let token = self.park(element.clone(), PendingMutation::Reorder { from, to });
        vec![Effect::Animate {
            element,
            kind: AnimKind::FlyTo { target },
            duration_ms: self.cfg.animation.fly_ms,
            token,
        }]
    }

    fn commit(&mut self, mutation: PendingMutation) -> Vec<Effect> {
        match mutation {
            PendingMutation::Move {
                task_id,
                category_id,
            } => match self.store.move_task_to_category(&task_id, &category_id) {
                Ok(moved) => {
                    // landing in Completed checks the task; leaving unchecks it
                    let completed = self
                        .store
                        .category_named("Completed")
                        .map(|c| c.id == category_id)
                        .unwrap_or(false);
                    if moved.checked != completed {
                        let mut task = moved;
                        task.checked = completed;
                        self.store.update_task(task);
                    }
                    vec![
                        Effect::Committed(Mutation::Moved {
                            task_id: task_id.clone(),
                            category_id,
                        }),
                        self.animate(
                            ElementId::Task(task_id),
                            AnimKind::Reset,
                            self.cfg.animation.reset_ms,
                        ),
                    ]
                }
                Err(err) => {
                    // the task vanished mid-animation; nothing to move
                    warn!(%err, "drop commit skipped");
                    Vec::new()
                }
            },
            PendingMutation::Delete { task_id } => {
                self.store.delete_task(&task_id);
                vec![Effect::Committed(Mutation::Deleted { task_id })]
            }
            PendingMutation::Reorder { from, to } => {
                self.store.reorder_categories(from, to);
                let reset = self.animate(
                    // the dragged button is back in the (reordered) row
                    ElementId::Category(
                        self.store
                            .categories()
                            .get(to)
                            .map(|c| c.id.clone())
                            .unwrap_or_default(),
                    ),
                    AnimKind::Reset,
                    self.cfg.animation.reset_ms,
                );
                vec![Effect::Committed(Mutation::Reordered { from, to }), reset]
            }
        }
    }

    /// Replace this element's stale pending commit with a fresh one
    fn park(&mut self, element: ElementId, mutation: PendingMutation) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        self.pending.insert(element, PendingCommit { token, mutation });
        token
    }

    fn animate(&mut self, element: ElementId, kind: AnimKind, duration_ms: u64) -> Effect {
        let token = self.next_token;
        self.next_token += 1;
        Effect::Animate {
            element,
            kind,
            duration_ms,
            token,
        }
    }

    fn task_category(&self, task_id: &str) -> String {
        self.store
            .task(task_id)
            .map(|t| t.category_id.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::store::{DATA_KEY, MemKv, Snapshot};
    use pretty_assertions::assert_eq;

    fn coordinator() -> Coordinator {
        let kv = MemKv::default();
        kv.preload(DATA_KEY, &Snapshot::default_data().encode().unwrap());
        Coordinator::new(Store::open(kv), Config::default())
    }

    // category row recorded at the original touch geometry: buttons are
    // offset (20, 90) on screen with 30 of grace below
    fn layouts() -> LayoutRegistry {
        let mut reg = LayoutRegistry::default();
        reg.record("c1", Rect::new(0.0, 0.0, 60.0, 30.0));
        reg.record("c2", Rect::new(70.0, 0.0, 60.0, 30.0));
        reg.record("c3", Rect::new(140.0, 0.0, 60.0, 30.0));
        reg.record("c4", Rect::new(210.0, 0.0, 60.0, 30.0));
        reg
    }

    fn drag_end(x: f32, y: f32) -> GestureEvent {
        GestureEvent::DragEnd {
            translation: Point::default(),
            absolute: Point::new(x, y),
        }
    }

    fn fly_token(effects: &[Effect]) -> u64 {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Animate {
                    kind: AnimKind::FlyTo { .. } | AnimKind::Exit { .. },
                    token,
                    ..
                } => Some(*token),
                _ => None,
            })
            .expect("expected a gated animation")
    }

    #[test]
    fn tap_on_a_task_requests_the_editor() {
        let mut c = coordinator();
        let effects = c.on_task_gesture("t1", GestureEvent::Tap, &layouts());
        match &effects[..] {
            [Effect::EditRequested(task)] => assert_eq!(task.id, "t1"),
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn drop_on_a_new_category_commits_only_after_the_animation() {
        let mut c = coordinator();
        let reg = layouts();

        // release inside c2's hit region
        let effects = c.on_task_gesture("t1", drag_end(120.0, 100.0), &reg);
        assert!(effects.contains(&Effect::DragHighlight(None)));
        let token = fly_token(&effects);

        // store untouched while the animation runs
        assert_eq!(c.store().task("t1").unwrap().category_id, "c1");

        // scale and vertical position settle first: still nothing
        assert_eq!(c.on_animation_complete(token, AnimProp::Scale), []);
        assert_eq!(c.on_animation_complete(token, AnimProp::TranslateY), []);
        assert_eq!(c.store().task("t1").unwrap().category_id, "c1");

        // the authoritative property commits exactly once
        let effects = c.on_animation_complete(token, AnimProp::TranslateX);
        assert!(effects.contains(&Effect::Committed(Mutation::Moved {
            task_id: "t1".into(),
            category_id: "c2".into(),
        })));
        assert_eq!(c.store().task("t1").unwrap().category_id, "c2");

        // a duplicate completion cannot double-commit
        assert_eq!(c.on_animation_complete(token, AnimProp::TranslateX), []);
        assert_eq!(c.store().task("t1").unwrap().category_id, "c2");
    }

    #[test]
    fn drop_with_no_target_resets_without_mutating() {
        let mut c = coordinator();
        let effects = c.on_task_gesture("t1", drag_end(500.0, 400.0), &layouts());
        assert!(matches!(
            effects[..],
            [
                Effect::DragHighlight(None),
                Effect::Animate {
                    kind: AnimKind::Reset,
                    ..
                }
            ]
        ));
        assert_eq!(c.store().task("t1").unwrap().category_id, "c1");
    }

    #[test]
    fn drop_on_the_current_category_resets_too() {
        let mut c = coordinator();
        // inside c1's own hit region
        let effects = c.on_task_gesture("t1", drag_end(50.0, 100.0), &layouts());
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Animate {
                kind: AnimKind::Reset,
                ..
            }
        )));
        assert_eq!(c.store().task("t1").unwrap().category_id, "c1");
    }

    #[test]
    fn stale_completion_after_a_reset_does_not_commit() {
        let mut c = coordinator();
        let reg = layouts();
        let effects = c.on_task_gesture("t1", drag_end(120.0, 100.0), &reg);
        let token = fly_token(&effects);

        // a new gesture starts before the old animation reports completion
        c.on_task_gesture("t1", drag_end(500.0, 400.0), &reg);
        assert_eq!(c.on_animation_complete(token, AnimProp::TranslateX), []);
        assert_eq!(c.store().task("t1").unwrap().category_id, "c1");
    }

    #[test]
    fn swipe_past_the_threshold_deletes_after_the_exit() {
        let mut c = coordinator();
        let effects =
            c.on_task_gesture("t2", GestureEvent::SwipeEnd { translation_x: 80.0 }, &layouts());
        let token = fly_token(&effects);
        assert!(c.store().task("t2").is_some());

        let effects = c.on_animation_complete(token, AnimProp::TranslateX);
        assert_eq!(
            effects,
            [Effect::Committed(Mutation::Deleted {
                task_id: "t2".into()
            })]
        );
        assert!(c.store().task("t2").is_none());
        assert_eq!(c.store().categories().len(), 4);
    }

    #[test]
    fn swipe_below_the_threshold_resets() {
        let mut c = coordinator();
        let effects = c.on_task_gesture(
            "t2",
            GestureEvent::SwipeEnd {
                translation_x: -40.0,
            },
            &layouts(),
        );
        assert!(matches!(
            effects[..],
            [Effect::Animate {
                kind: AnimKind::Reset,
                ..
            }]
        ));
        assert!(c.store().task("t2").is_some());
    }

    #[test]
    fn checkbox_check_moves_to_completed_and_back() {
        let mut c = coordinator();

        let effects = c.on_checkbox_toggled("t1", true);
        assert_eq!(
            effects,
            [Effect::Committed(Mutation::Moved {
                task_id: "t1".into(),
                category_id: "c4".into(),
            })]
        );
        let task = c.store().task("t1").unwrap();
        assert!(task.checked);
        assert_eq!(task.category_id, "c4");

        c.on_checkbox_toggled("t1", false);
        let task = c.store().task("t1").unwrap();
        assert!(!task.checked);
        assert_eq!(task.category_id, "c1");
    }

    #[test]
    fn checked_tasks_always_live_in_completed() {
        let mut c = coordinator();
        let reg = layouts();

        // toggle, drag elsewhere, toggle again — the invariant holds after
        // every commit
        c.on_checkbox_toggled("t1", true);
        let effects = c.on_task_gesture("t1", drag_end(120.0, 100.0), &reg);
        let token = fly_token(&effects);
        c.on_animation_complete(token, AnimProp::TranslateX);
        // un-checking from c2 still lands in ToDo
        c.on_checkbox_toggled("t1", false);

        for task in c.store().tasks() {
            let completed_id = c.store().category_named("Completed").unwrap().id.clone();
            assert_eq!(task.checked, task.category_id == completed_id);
        }
    }

    #[test]
    fn drag_into_completed_checks_and_dragging_out_unchecks() {
        let mut c = coordinator();
        let reg = layouts();

        // release inside c4 (Completed): the commit must also check the task
        let effects = c.on_task_gesture("t1", drag_end(250.0, 100.0), &reg);
        let token = fly_token(&effects);
        c.on_animation_complete(token, AnimProp::TranslateX);
        let task = c.store().task("t1").unwrap();
        assert_eq!(task.category_id, "c4");
        assert!(task.checked);

        // dragging back out to an ordinary category unchecks it again
        let effects = c.on_task_gesture("t1", drag_end(120.0, 100.0), &reg);
        let token = fly_token(&effects);
        c.on_animation_complete(token, AnimProp::TranslateX);
        let task = c.store().task("t1").unwrap();
        assert_eq!(task.category_id, "c2");
        assert!(!task.checked);
    }

    #[test]
    fn reset_on_one_task_leaves_another_tasks_pending_delete_intact() {
        let mut c = coordinator();
        let reg = layouts();

        // t1's delete is parked behind its exit animation
        let effects =
            c.on_task_gesture("t1", GestureEvent::SwipeEnd { translation_x: 80.0 }, &reg);
        let token = fly_token(&effects);

        // an unrelated short swipe on t2 resets t2 only
        c.on_task_gesture(
            "t2",
            GestureEvent::SwipeEnd {
                translation_x: -40.0,
            },
            &reg,
        );

        let effects = c.on_animation_complete(token, AnimProp::TranslateX);
        assert!(effects.contains(&Effect::Committed(Mutation::Deleted {
            task_id: "t1".into()
        })));
        assert!(c.store().task("t1").is_none());
        assert!(c.store().task("t2").is_some());
    }

    #[test]
    fn double_tap_on_reserved_category_is_rejected_before_any_prompt() {
        let mut c = coordinator();
        let effects = c.on_category_gesture("c1", GestureEvent::DoubleTap, &layouts());
        assert!(matches!(
            effects[..],
            [Effect::RenameRejected { .. }]
        ));

        let effects = c.on_category_gesture("c3", GestureEvent::DoubleTap, &layouts());
        match &effects[..] {
            [Effect::RenamePromptRequested(cat)] => assert_eq!(cat.name, "School"),
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn rename_confirmation_commits_non_empty_input() {
        let mut c = coordinator();
        assert_eq!(c.on_rename_confirmed("c3", "   "), []);
        let effects = c.on_rename_confirmed("c3", "Projects");
        assert_eq!(
            effects,
            [Effect::Committed(Mutation::Renamed {
                category_id: "c3".into(),
                name: "Projects".into(),
            })]
        );
        assert_eq!(c.store().category("c3").unwrap().name, "Projects");
    }

    #[test]
    fn category_drag_reorders_after_the_flight() {
        let mut c = coordinator();
        let reg = layouts();

        // drag c2 (index 1) to the last slot: absolute x near slot 3
        let effects = c.on_category_gesture("c2", drag_end(260.0, 100.0), &reg);
        let token = fly_token(&effects);
        let names = |c: &Coordinator| -> Vec<String> {
            c.store().categories().iter().map(|x| x.name.clone()).collect()
        };
        assert_eq!(names(&c), ["ToDo", "Work", "School", "Completed"]);

        let effects = c.on_animation_complete(token, AnimProp::TranslateX);
        assert!(effects.contains(&Effect::Committed(Mutation::Reordered { from: 1, to: 3 })));
        assert_eq!(names(&c), ["ToDo", "School", "Completed", "Work"]);
    }

    #[test]
    fn category_drag_to_its_own_slot_resets() {
        let mut c = coordinator();
        // c2 is index 1; slot math lands on 1
        let effects = c.on_category_gesture("c2", drag_end(100.0, 100.0), &layouts());
        assert!(matches!(
            effects[..],
            [Effect::Animate {
                kind: AnimKind::Reset,
                ..
            }]
        ));
    }

    #[test]
    fn save_rejects_empty_titles_and_normalizes_reminders() {
        let mut c = coordinator();
        let draft = Task::draft("c1");
        assert_eq!(c.on_task_saved(draft), Err(SaveError::EmptyTitle));

        let mut draft = Task::draft("c1");
        draft.title = "Write report".into();
        draft.reminder = crate::model::ReminderLead::Min30;
        let effects = c.on_task_saved(draft).unwrap();
        // no deadline: the orphaned lead was cleared, so no reminder either
        assert!(matches!(effects[..], [Effect::Committed(Mutation::Saved(_))]));
        let saved = c.store().tasks().first().unwrap();
        assert_eq!(saved.reminder, crate::model::ReminderLead::NoReminder);
        assert!(!saved.id.is_empty());
    }

    #[test]
    fn save_with_deadline_and_lead_schedules_a_reminder() {
        use chrono::TimeZone;
        let mut c = coordinator();
        let mut draft = Task::draft("c1");
        draft.title = "Hand in essay".into();
        draft.date_time = Some(Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap());
        draft.reminder = crate::model::ReminderLead::Hour1;

        let effects = c.on_task_saved(draft).unwrap();
        match &effects[..] {
            [
                Effect::ScheduleReminder { trigger_at, .. },
                Effect::Committed(Mutation::Saved(_)),
            ] => {
                assert_eq!(
                    *trigger_at,
                    Utc.with_ymd_and_hms(2026, 9, 1, 17, 0, 0).unwrap()
                );
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }
}
