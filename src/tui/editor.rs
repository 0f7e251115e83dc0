//! State for the task editor popup: title, description, deadline, and
//! reminder lead, edited field by field.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::model::{ReminderLead, Task};

pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Description,
    Deadline,
    Reminder,
}

impl EditorField {
    const ORDER: [EditorField; 4] = [
        EditorField::Title,
        EditorField::Description,
        EditorField::Deadline,
        EditorField::Reminder,
    ];

    pub fn next(self) -> EditorField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> EditorField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// The editor popup's working copy. Nothing touches the store until the
/// user saves.
#[derive(Debug, Clone)]
pub struct EditorState {
    /// The task being edited (empty id for a new draft)
    task: Task,
    pub field: EditorField,
    pub title: String,
    pub description: String,
    /// Deadline as typed, local time, `YYYY-MM-DD HH:MM`; empty = none
    pub deadline: String,
    pub reminder: ReminderLead,
    pub error: Option<String>,
}

impl EditorState {
    /// Edit an existing task, prefilled
    pub fn for_task(task: Task) -> EditorState {
        let deadline = task
            .date_time
            .map(|dt| dt.with_timezone(&Local).format(DEADLINE_FORMAT).to_string())
            .unwrap_or_default();
        EditorState {
            field: EditorField::Title,
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            deadline,
            reminder: task.reminder,
            error: None,
            task,
        }
    }

    /// A blank draft in the given category
    pub fn for_new(category_id: &str) -> EditorState {
        EditorState::for_task(Task::draft(category_id))
    }

    pub fn is_new(&self) -> bool {
        self.task.id.is_empty()
    }

    pub fn push_char(&mut self, c: char) {
        self.error = None;
        match self.field {
            EditorField::Title => self.title.push(c),
            EditorField::Description => self.description.push(c),
            EditorField::Deadline => self.deadline.push(c),
            EditorField::Reminder => {
                if c == ' ' {
                    self.reminder = self.reminder.next();
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        self.error = None;
        match self.field {
            EditorField::Title => {
                self.title.pop();
            }
            EditorField::Description => {
                self.description.pop();
            }
            EditorField::Deadline => {
                self.deadline.pop();
            }
            EditorField::Reminder => {}
        }
    }

    pub fn cycle_reminder(&mut self) {
        self.reminder = self.reminder.next();
    }

    /// Assemble the task to save. Deadline parse errors and an empty
    /// title are reported without leaving the editor.
    pub fn build(&self) -> Result<Task, String> {
        if self.title.trim().is_empty() {
            return Err("a title is required".to_string());
        }
        let date_time = parse_deadline(&self.deadline)?;
        let mut task = self.task.clone();
        task.title = self.title.trim().to_string();
        task.description = match self.description.trim() {
            "" => None,
            d => Some(d.to_string()),
        };
        task.date_time = date_time;
        task.reminder = self.reminder;
        Ok(task)
    }
}

fn parse_deadline(input: &str) -> Result<Option<DateTime<Utc>>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let naive = NaiveDateTime::parse_from_str(input, DEADLINE_FORMAT)
        .map_err(|_| format!("deadline must look like 2026-09-01 18:00, got \"{input}\""))?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("\"{input}\" is not a valid local time"))?;
    Ok(Some(local.with_timezone(&Utc)))
}
