use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::engine::{AnimKind, AnimProp, Effect, ElementId, Engine};
use crate::geometry::{Point, Rect};
use crate::gesture::{PointerEvent, PointerPhase};
use crate::model::Config;
use crate::reminder::{LogNotifier, Notifier};
use crate::store::{DATA_KEY, FileKv, KvStore, PersistError, Snapshot, Store};

use super::editor::EditorState;
use super::{input, render};

/// Current interaction mode
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    /// Task editor popup is open
    Edit(EditorState),
    /// Category rename prompt is open
    Rename(RenameState),
}

#[derive(Debug, Clone)]
pub struct RenameState {
    pub category_id: String,
    pub current_name: String,
    pub input: String,
}

/// What a screen cell belongs to, rebuilt by the renderer every frame
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    Category(String),
    TaskRow(String),
    Checkbox(String),
    AddButton,
}

/// A compound animation in flight. All four properties share one duration
/// here; completion still reports them property by property, horizontal
/// position last, because that is the completion the engine commits on.
#[derive(Debug, Clone)]
struct RunningAnim {
    element: ElementId,
    kind: AnimKind,
    token: u64,
    started_at: u64,
    duration_ms: u64,
}

/// Main application state
pub struct App {
    pub engine: Engine,
    pub mode: Mode,
    pub should_quit: bool,
    /// Category whose tasks fill the list
    pub selected_category: String,
    /// One-line message under the header
    pub status: Option<String>,
    /// Screen regions the renderer drew interactive elements into
    pub hits: Vec<(Rect, HitTarget)>,
    /// Live visual offsets for elements mid-gesture or mid-animation
    pub offsets: HashMap<ElementId, Point>,
    /// Drop target to highlight while a task drag is in flight
    pub drop_highlight: Option<String>,
    /// Element the current pointer stream is attributed to
    pointer_target: Option<ElementId>,
    anims: Vec<RunningAnim>,
    notifier: LogNotifier,
    started: Instant,
}

impl App {
    pub fn new(engine: Engine) -> App {
        let selected_category = engine
            .store()
            .categories()
            .first()
            .map(|c| c.id.clone())
            .unwrap_or_default();
        App {
            engine,
            mode: Mode::Normal,
            should_quit: false,
            selected_category,
            status: None,
            hits: Vec::new(),
            offsets: HashMap::new(),
            drop_highlight: None,
            pointer_target: None,
            anims: Vec::new(),
            notifier: LogNotifier::default(),
            started: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// The innermost hit target under a screen position, if any.
    /// Later entries are drawn on top, so they win.
    pub fn hit_at(&self, pos: Point) -> Option<&HitTarget> {
        self.hits
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, target)| target)
    }

    /// Begin a pointer stream on an element (mouse button down)
    pub fn pointer_down(&mut self, element: ElementId, pos: Point) {
        self.pointer_target = Some(element.clone());
        self.feed(element, PointerPhase::Down, pos);
    }

    /// Continue the active pointer stream, if there is one
    pub fn pointer_move(&mut self, pos: Point) {
        if let Some(element) = self.pointer_target.clone() {
            self.feed(element, PointerPhase::Move, pos);
        }
    }

    pub fn pointer_up(&mut self, pos: Point) {
        if let Some(element) = self.pointer_target.take() {
            self.feed(element, PointerPhase::Up, pos);
        }
    }

    /// Abandon the active stream (focus loss, mode change)
    pub fn pointer_cancel(&mut self) {
        if let Some(element) = self.pointer_target.take() {
            let pos = Point::default();
            self.feed(element, PointerPhase::Cancel, pos);
        }
    }

    fn feed(&mut self, element: ElementId, phase: PointerPhase, pos: Point) {
        let ev = PointerEvent::new(phase, self.now_ms(), pos);
        let out = self.engine.pointer(&element, ev);
        self.consume(out);
    }

    /// Advance gesture timers and the animation runner
    pub fn tick(&mut self) {
        let now = self.now_ms();
        let out = self.engine.tick(now);
        self.consume(out);
        self.pump_animations(now);
    }

    pub fn checkbox_toggled(&mut self, task_id: &str) {
        let checked = self
            .engine
            .store()
            .task(task_id)
            .map(|t| !t.checked)
            .unwrap_or(true);
        let effects = self.engine.checkbox_toggled(task_id, checked);
        self.apply_effects(effects);
    }

    pub fn open_editor_for_new(&mut self) {
        self.mode = Mode::Edit(EditorState::for_new(&self.selected_category.clone()));
    }

    /// Save button in the editor. On success the popup closes; editor
    /// errors keep it open with the message shown inline.
    pub fn editor_save(&mut self) {
        let Mode::Edit(editor) = &mut self.mode else {
            return;
        };
        match editor.build() {
            Ok(task) => match self.engine.save_task(task) {
                Ok(effects) => {
                    self.mode = Mode::Normal;
                    self.apply_effects(effects);
                }
                Err(err) => {
                    if let Mode::Edit(editor) = &mut self.mode {
                        editor.error = Some(err.to_string());
                    }
                }
            },
            Err(msg) => editor.error = Some(msg),
        }
    }

    pub fn rename_save(&mut self) {
        let Mode::Rename(rename) = &self.mode else {
            return;
        };
        let (category_id, entered) = (rename.category_id.clone(), rename.input.clone());
        self.mode = Mode::Normal;
        let effects = self.engine.rename_confirmed(&category_id, &entered);
        self.apply_effects(effects);
    }

    fn consume(&mut self, out: crate::engine::Output) {
        use crate::gesture::GestureEvent;
        for (element, gesture) in &out.gestures {
            match gesture {
                GestureEvent::DragMove { translation, .. } => {
                    self.offsets.insert(element.clone(), *translation);
                }
                GestureEvent::SwipeMove { translation_x } => {
                    self.offsets
                        .insert(element.clone(), Point::new(*translation_x, 0.0));
                }
                GestureEvent::Tap | GestureEvent::DoubleTap | GestureEvent::Cancel => {
                    self.offsets.remove(element);
                }
                _ => {}
            }
        }
        self.apply_effects(out.effects);
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CategorySelected(id) => {
                    self.selected_category = id;
                    self.status = None;
                }
                Effect::EditRequested(task) => {
                    self.mode = Mode::Edit(EditorState::for_task(task));
                }
                Effect::DragHighlight(target) => self.drop_highlight = target,
                Effect::RenamePromptRequested(category) => {
                    self.mode = Mode::Rename(RenameState {
                        category_id: category.id,
                        current_name: category.name,
                        input: String::new(),
                    });
                }
                Effect::RenameRejected { reason, .. } => self.status = Some(reason),
                Effect::Animate {
                    element,
                    kind,
                    duration_ms,
                    token,
                } => self.anims.push(RunningAnim {
                    element,
                    kind,
                    token,
                    started_at: self.now_ms(),
                    duration_ms,
                }),
                Effect::Committed(mutation) => {
                    debug!(?mutation, "committed");
                }
                Effect::ScheduleReminder {
                    title,
                    body,
                    trigger_at,
                } => {
                    self.notifier.schedule(&title, &body, trigger_at);
                }
            }
        }
    }

    /// Finish animations whose time is up, reporting each property's
    /// completion to the engine with the horizontal position last
    fn pump_animations(&mut self, now: u64) {
        let mut finished = Vec::new();
        self.anims.retain(|anim| {
            if now >= anim.started_at + anim.duration_ms {
                finished.push(anim.clone());
                false
            } else {
                true
            }
        });
        for anim in finished {
            self.offsets.remove(&anim.element);
            if matches!(anim.kind, AnimKind::FlyTo { .. }) {
                self.drop_highlight = None;
            }
            for prop in [
                AnimProp::Opacity,
                AnimProp::Scale,
                AnimProp::TranslateY,
                AnimProp::TranslateX,
            ] {
                let effects = self.engine.animation_complete(anim.token, prop);
                self.apply_effects(effects);
            }
        }
    }
}

/// Open (and seed, on first run) the data directory, then run the TUI
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let kv = open_seeded(data_dir)?;
    let config = if data_dir.join("voila.toml").exists() {
        Config::load(data_dir)?
    } else {
        Config::terminal()
    };
    let mut app = App::new(Engine::new(Store::open(kv), config));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal even if we panic mid-draw
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

/// First run writes the starter dataset so the screen is not empty
fn open_seeded(data_dir: &Path) -> Result<FileKv, PersistError> {
    let mut kv = FileKv::open(data_dir)?;
    if kv.get(DATA_KEY).is_none()
        && let Ok(seed) = Snapshot::default_data().encode()
    {
        kv.set(DATA_KEY, &seed)?;
    }
    Ok(kv)
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        // Short poll: gesture timers (long press, double-tap window) and
        // animation completions fire from tick() between input events
        if event::poll(Duration::from_millis(30))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::FocusLost => app.pointer_cancel(),
                _ => {}
            }
        }
        app.tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
