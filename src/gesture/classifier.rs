use crate::geometry::Point;
use crate::model::GestureConfig;

use super::{GestureCaps, GestureEvent, PointerEvent, PointerPhase};

/// Recognition state for one element's current gesture instance
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    /// Pointer is down, nothing recognized yet
    Pressed {
        down_at: u64,
        origin: Point,
        /// Pointer has stayed inside the long-press jitter radius
        within_jitter: bool,
        /// Pointer has stayed inside the tap slop radius
        within_slop: bool,
        /// Vertical travel exceeded the swipe tolerance at some point;
        /// once true a swipe can never activate on this press
        swipe_failed: bool,
    },
    /// A tap completed but is held back until the double-tap window closes
    TapWait { deadline: u64 },
    /// Second press within the double-tap window
    SecondPressed {
        down_at: u64,
        origin: Point,
        spoiled: bool,
        /// Pointer has stayed inside the long-press jitter radius
        within_jitter: bool,
    },
    Dragging { origin: Point },
    Swiping { origin: Point },
}

/// Per-element state machine that turns a raw pointer stream into discrete
/// gesture events. Tap, double tap, long-press drag and horizontal swipe
/// share the one stream; disambiguation is by mutually exclusive
/// time/distance/direction guards, with double tap outranking single tap
/// and drag-vs-swipe decided by whichever activation condition is met
/// first. All timing comes from event timestamps plus explicit `on_tick`
/// calls, so the machine is fully deterministic under test.
#[derive(Debug)]
pub struct GestureClassifier {
    caps: GestureCaps,
    cfg: GestureConfig,
    state: State,
}

impl GestureClassifier {
    pub fn new(caps: GestureCaps, cfg: GestureConfig) -> Self {
        GestureClassifier {
            caps,
            cfg,
            state: State::Idle,
        }
    }

    /// True when no gesture instance is in flight
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Feed one pointer sample; returns the gesture events it produced
    pub fn on_pointer(&mut self, ev: PointerEvent) -> Vec<GestureEvent> {
        match ev.phase {
            PointerPhase::Down => self.on_down(ev),
            PointerPhase::Move => self.on_move(ev),
            PointerPhase::Up => self.on_up(ev),
            PointerPhase::Cancel => self.on_cancel(),
        }
    }

    /// Advance time with no pointer activity. Fires the two timer-only
    /// transitions: long-press activating a drag, and a deferred single
    /// tap committing once the double-tap window closes.
    pub fn on_tick(&mut self, now: u64) -> Vec<GestureEvent> {
        match self.state {
            State::Pressed {
                down_at,
                origin,
                within_jitter: true,
                ..
            } if self.caps.drag && now.saturating_sub(down_at) >= self.cfg.long_press_ms => {
                self.state = State::Dragging { origin };
                vec![GestureEvent::DragStart]
            }
            State::SecondPressed {
                down_at,
                origin,
                within_jitter: true,
                ..
            } if self.caps.drag && now.saturating_sub(down_at) >= self.cfg.long_press_ms => {
                // tap-then-hold: the held second press becomes a drag and
                // the deferred first tap is dropped
                self.state = State::Dragging { origin };
                vec![GestureEvent::DragStart]
            }
            State::TapWait { deadline } if now >= deadline => {
                self.state = State::Idle;
                vec![GestureEvent::Tap]
            }
            _ => Vec::new(),
        }
    }

    fn on_down(&mut self, ev: PointerEvent) -> Vec<GestureEvent> {
        match self.state {
            State::TapWait { deadline } if ev.at <= deadline => {
                self.state = State::SecondPressed {
                    down_at: ev.at,
                    origin: ev.position,
                    spoiled: false,
                    within_jitter: true,
                };
                Vec::new()
            }
            State::TapWait { .. } => {
                // window already closed without a tick — commit the held
                // tap, then start a fresh gesture
                self.state = State::Pressed {
                    down_at: ev.at,
                    origin: ev.position,
                    within_jitter: true,
                    within_slop: true,
                    swipe_failed: false,
                };
                vec![GestureEvent::Tap]
            }
            _ => {
                self.state = State::Pressed {
                    down_at: ev.at,
                    origin: ev.position,
                    within_jitter: true,
                    within_slop: true,
                    swipe_failed: false,
                };
                Vec::new()
            }
        }
    }

    fn on_move(&mut self, ev: PointerEvent) -> Vec<GestureEvent> {
        match self.state {
            State::Pressed {
                down_at,
                origin,
                within_jitter,
                within_slop,
                swipe_failed,
            } => {
                let translation = ev.position.offset_from(origin);
                let held = ev.at.saturating_sub(down_at);

                // Long-press drag: the hold elapsed while the pointer sat
                // still. Checked before folding in this sample — movement
                // after the hold is drag movement, not jitter.
                if self.caps.drag && within_jitter && held >= self.cfg.long_press_ms {
                    self.state = State::Dragging { origin };
                    return vec![
                        GestureEvent::DragStart,
                        GestureEvent::DragMove {
                            translation,
                            absolute: ev.position,
                        },
                    ];
                }

                let distance = ev.position.distance(origin);
                let within_jitter = within_jitter && distance <= self.cfg.drag_jitter;
                let within_slop = within_slop && distance <= self.cfg.tap_slop;
                // the swipe failure latches: wandering vertically and then
                // straightening out does not re-arm the swipe
                let swipe_failed =
                    swipe_failed || translation.y.abs() > self.cfg.swipe_fail_y;

                // Swipe: predominantly horizontal movement before any drag
                if self.caps.swipe
                    && !swipe_failed
                    && translation.x.abs() >= self.cfg.swipe_activate_x
                {
                    self.state = State::Swiping { origin };
                    return vec![GestureEvent::SwipeMove {
                        translation_x: translation.x,
                    }];
                }
                self.state = State::Pressed {
                    down_at,
                    origin,
                    within_jitter,
                    within_slop,
                    swipe_failed,
                };
                Vec::new()
            }
            State::SecondPressed {
                down_at,
                origin,
                spoiled,
                within_jitter,
            } => {
                let held = ev.at.saturating_sub(down_at);
                // a held second press can activate a drag just like a held
                // first press
                if self.caps.drag && within_jitter && held >= self.cfg.long_press_ms {
                    self.state = State::Dragging { origin };
                    return vec![
                        GestureEvent::DragStart,
                        GestureEvent::DragMove {
                            translation: ev.position.offset_from(origin),
                            absolute: ev.position,
                        },
                    ];
                }

                let distance = ev.position.distance(origin);
                self.state = State::SecondPressed {
                    down_at,
                    origin,
                    spoiled: spoiled || distance > self.cfg.tap_slop,
                    within_jitter: within_jitter && distance <= self.cfg.drag_jitter,
                };
                Vec::new()
            }
            State::Dragging { origin } => {
                let translation = ev.position.offset_from(origin);
                vec![GestureEvent::DragMove {
                    translation,
                    absolute: ev.position,
                }]
            }
            State::Swiping { origin } => {
                let translation = ev.position.offset_from(origin);
                vec![GestureEvent::SwipeMove {
                    translation_x: translation.x,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn on_up(&mut self, ev: PointerEvent) -> Vec<GestureEvent> {
        match self.state {
            State::Pressed {
                down_at,
                within_slop,
                ..
            } => {
                let tap = within_slop && ev.at.saturating_sub(down_at) <= self.cfg.tap_max_ms;
                if tap && self.caps.double_tap {
                    // hold the tap back until a second tap can be ruled out
                    self.state = State::TapWait {
                        deadline: ev.at + self.cfg.double_tap_window_ms,
                    };
                    Vec::new()
                } else if tap {
                    self.state = State::Idle;
                    vec![GestureEvent::Tap]
                } else {
                    self.state = State::Idle;
                    vec![GestureEvent::Cancel]
                }
            }
            State::SecondPressed {
                down_at, spoiled, ..
            } => {
                self.state = State::Idle;
                if !spoiled && ev.at.saturating_sub(down_at) <= self.cfg.tap_max_ms {
                    vec![GestureEvent::DoubleTap]
                } else {
                    vec![GestureEvent::Cancel]
                }
            }
            State::Dragging { origin } => {
                self.state = State::Idle;
                vec![GestureEvent::DragEnd {
                    translation: ev.position.offset_from(origin),
                    absolute: ev.position,
                }]
            }
            State::Swiping { origin } => {
                self.state = State::Idle;
                vec![GestureEvent::SwipeEnd {
                    translation_x: ev.position.x - origin.x,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn on_cancel(&mut self) -> Vec<GestureEvent> {
        let events = match self.state {
            State::Idle => Vec::new(),
            // the first tap already completed; don't lose it
            State::TapWait { .. } => vec![GestureEvent::Tap],
            _ => vec![GestureEvent::Cancel],
        };
        self.state = State::Idle;
        events
    }
}
