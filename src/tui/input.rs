use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::engine::ElementId;
use crate::geometry::Point;

use super::app::{App, HitTarget, Mode};

/// Mouse events drive the gesture pipeline: press starts a pointer stream
/// on whatever element is under the cursor, drag continues it, release
/// ends it. Checkboxes and the add button are plain click targets that
/// bypass gesture recognition.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let pos = Point::new(f32::from(mouse.column), f32::from(mouse.row));
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !matches!(app.mode, Mode::Normal) {
                return;
            }
            match app.hit_at(pos).cloned() {
                Some(HitTarget::Checkbox(task_id)) => app.checkbox_toggled(&task_id),
                Some(HitTarget::AddButton) => app.open_editor_for_new(),
                Some(HitTarget::TaskRow(task_id)) => {
                    app.pointer_down(ElementId::Task(task_id), pos);
                }
                Some(HitTarget::Category(category_id)) => {
                    app.pointer_down(ElementId::Category(category_id), pos);
                }
                None => {}
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => app.pointer_move(pos),
        MouseEventKind::Up(MouseButton::Left) => app.pointer_up(pos),
        _ => {}
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match &mut app.mode {
        Mode::Normal => handle_normal_key(app, key),
        Mode::Edit(_) => handle_editor_key(app, key),
        Mode::Rename(_) => handle_rename_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('a') => app.open_editor_for_new(),
        // step through the category row without the mouse
        KeyCode::Left | KeyCode::Char('h') => select_adjacent_category(app, -1),
        KeyCode::Right | KeyCode::Char('l') => select_adjacent_category(app, 1),
        KeyCode::Esc => {
            app.pointer_cancel();
            app.status = None;
        }
        _ => {}
    }
}

fn select_adjacent_category(app: &mut App, step: isize) {
    let categories = app.engine.store().categories();
    if categories.is_empty() {
        return;
    }
    let current = categories
        .iter()
        .position(|c| c.id == app.selected_category)
        .unwrap_or(0) as isize;
    let next = (current + step).rem_euclid(categories.len() as isize) as usize;
    app.selected_category = categories[next].id.clone();
}

fn handle_editor_key(app: &mut App, key: KeyEvent) {
    let Mode::Edit(editor) = &mut app.mode else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Enter => app.editor_save(),
        KeyCode::Tab | KeyCode::Down => editor.field = editor.field.next(),
        KeyCode::BackTab | KeyCode::Up => editor.field = editor.field.prev(),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Char(c) => editor.push_char(c),
        _ => {}
    }
}

fn handle_rename_key(app: &mut App, key: KeyEvent) {
    let Mode::Rename(rename) = &mut app.mode else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Enter => app.rename_save(),
        KeyCode::Backspace => {
            rename.input.pop();
        }
        KeyCode::Char(c) => rename.input.push(c),
        _ => {}
    }
}
