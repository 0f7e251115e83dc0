use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use chrono::Local;

use crate::engine::ElementId;
use crate::geometry::{Point, Rect as GeoRect};
use crate::tui::editor::{EditorField, EditorState};

use super::app::{App, HitTarget, Mode, RenameState};

/// Main render function. Rebuilds the hit map and re-records category
/// button rects into the engine every frame, so drops always resolve
/// against the layout actually on screen.
pub fn render(frame: &mut Frame, app: &mut App) {
    app.hits.clear();
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header + status
            Constraint::Length(3), // category row
            Constraint::Min(1),    // task list
            Constraint::Length(1), // key hints
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_category_row(frame, app, chunks[1]);
    render_task_list(frame, app, chunks[2]);
    render_hints(frame, chunks[3]);

    match app.mode.clone() {
        Mode::Edit(editor) => render_editor(frame, &editor, area),
        Mode::Rename(rename) => render_rename(frame, &rename, area),
        Mode::Normal => {}
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let today = Local::now().format("%A, %B %e").to_string();
    let title = Line::from(vec![
        Span::styled(
            " voila",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {today}"), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    if let Some(status) = &app.status {
        let line = Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Yellow),
        ));
        frame.render_widget(Paragraph::new(line), rows[1]);
    }
}

/// Category buttons, laid out left to right. Each button's rect feeds the
/// drop resolver and the hit map.
fn render_category_row(frame: &mut Frame, app: &mut App, area: Rect) {
    let categories: Vec<(String, String)> = app
        .engine
        .store()
        .categories()
        .iter()
        .map(|c| (c.id.clone(), c.name.clone()))
        .collect();

    let mut x = area.x + 1;
    for (id, name) in &categories {
        let width = (name.width() as u16).saturating_add(4);
        if x + width > area.right() {
            break;
        }
        let offset = app
            .offsets
            .get(&ElementId::Category(id.clone()))
            .copied()
            .unwrap_or_default();
        let rect = Rect {
            x: shift(x, offset.x, frame.area().width),
            y: shift(area.y, offset.y, frame.area().height),
            width,
            height: 3,
        }
        .intersection(frame.area());

        let selected = *id == app.selected_category;
        let highlighted = app.drop_highlight.as_deref() == Some(id.as_str());
        let style = if highlighted {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else if selected {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let block = Block::default().borders(Borders::ALL).border_style(style);
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {name} "), style)).block(block),
            rect,
        );

        app.engine.record_layout(id, geo(rect));
        app.hits.push((geo(rect), HitTarget::Category(id.clone())));
        x += width + 2;
    }

    // the add-task button rides at the right edge of the row
    let add = Rect {
        x: area.right().saturating_sub(6),
        y: area.y,
        width: 5,
        height: 3,
    }
    .intersection(frame.area());
    let style = Style::default().fg(Color::Green);
    frame.render_widget(
        Paragraph::new(Span::styled(" + ", style))
            .block(Block::default().borders(Borders::ALL).border_style(style)),
        add,
    );
    app.hits.push((geo(add), HitTarget::AddButton));
}

fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    struct Row {
        id: String,
        checked: bool,
        title: String,
        detail: String,
    }

    let rows: Vec<Row> = app
        .engine
        .store()
        .tasks_in(&app.selected_category.clone())
        .map(|t| {
            let mut detail = String::new();
            if let Some(dt) = t.date_time {
                detail.push_str(&dt.with_timezone(&Local).format("%b %e %H:%M").to_string());
            }
            if t.reminder.minutes() > 0 {
                if !detail.is_empty() {
                    detail.push_str("  ");
                }
                detail.push_str(t.reminder.label());
            }
            Row {
                id: t.id.clone(),
                checked: t.checked,
                title: t.title.clone(),
                detail,
            }
        })
        .collect();

    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                " nothing here — press a to add a task",
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    }

    let mut y = area.y;
    for row in rows {
        if y >= area.bottom() {
            break;
        }
        let offset = app
            .offsets
            .get(&ElementId::Task(row.id.clone()))
            .copied()
            .unwrap_or_default();
        let rect = Rect {
            x: shift(area.x, offset.x, frame.area().width),
            y: shift(y, offset.y, frame.area().height),
            width: area.width,
            height: 1,
        }
        .intersection(frame.area());

        let checkbox = if row.checked { "[x]" } else { "[ ]" };
        let title_style = if row.checked {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(Color::White)
        };
        // mid-gesture rows stand out so the offset reads as movement
        let row_style = if offset != Point::default() {
            title_style.add_modifier(Modifier::REVERSED)
        } else {
            title_style
        };
        let line = Line::from(vec![
            Span::styled(format!(" {checkbox} "), Style::default().fg(Color::Cyan)),
            Span::styled(row.title.clone(), row_style),
            Span::styled(
                format!("  {}", row.detail),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), rect);

        let checkbox_rect = GeoRect::new(f32::from(rect.x), f32::from(rect.y), 5.0, 1.0);
        let row_rect = GeoRect::new(
            f32::from(rect.x) + 5.0,
            f32::from(rect.y),
            f32::from(rect.width.saturating_sub(5)),
            1.0,
        );
        app.hits.push((row_rect, HitTarget::TaskRow(row.id.clone())));
        app.hits.push((checkbox_rect, HitTarget::Checkbox(row.id)));
        y += 1;
    }
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = " click: edit   hold+drag: move   swipe: delete   dbl-click category: rename   a: add   q: quit";
    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        area,
    );
}

// --- popups ---

fn render_editor(frame: &mut Frame, editor: &EditorState, area: Rect) {
    let popup = centered(area, 54, 12);
    frame.render_widget(Clear, popup);

    let title = if editor.is_new() { " new task " } else { " edit task " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let field_line = |label: &str, value: &str, field: EditorField| -> Line<'static> {
        let active = editor.field == field;
        let marker = if active { "> " } else { "  " };
        let label_style = if active {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Line::from(vec![
            Span::styled(format!("{marker}{label:<12}"), label_style),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
        ])
    };

    let mut lines = vec![
        field_line("title", &editor.title, EditorField::Title),
        field_line("description", &editor.description, EditorField::Description),
        field_line("deadline", &editor.deadline, EditorField::Deadline),
        field_line("reminder", editor.reminder.label(), EditorField::Reminder),
        Line::default(),
        Line::from(Span::styled(
            "  tab: next field   space: cycle reminder   enter: save   esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(error) = &editor.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(Color::Red),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_rename(frame: &mut Frame, rename: &RenameState, area: Rect) {
    let popup = centered(area, 44, 5);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" rename \"{}\" ", rename.current_name));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines = vec![
        Line::from(vec![
            Span::styled("  name: ", Style::default().fg(Color::Gray)),
            Span::styled(rename.input.clone(), Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "  enter: save   esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

// --- helpers ---

/// Nudge a cell coordinate by a fractional gesture offset, clamped to the
/// screen
fn shift(base: u16, offset: f32, max: u16) -> u16 {
    let shifted = (f32::from(base) + offset).round();
    shifted.clamp(0.0, f32::from(max.saturating_sub(1))) as u16
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn geo(rect: Rect) -> GeoRect {
    GeoRect::new(
        f32::from(rect.x),
        f32::from(rect.y),
        f32::from(rect.width),
        f32::from(rect.height),
    )
}
