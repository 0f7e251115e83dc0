use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lead time before a task's deadline at which a reminder fires.
/// `NoReminder` doubles as "no reminder set"; the lead is meaningless
/// without a deadline and is reset whenever the deadline is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ReminderLead {
    #[default]
    NoReminder,
    Min5,
    Min10,
    Min15,
    Min30,
    Hour1,
    Hour2,
    Day1,
}

impl ReminderLead {
    /// All options, in the order the editor offers them
    pub const ALL: [ReminderLead; 8] = [
        ReminderLead::NoReminder,
        ReminderLead::Min5,
        ReminderLead::Min10,
        ReminderLead::Min15,
        ReminderLead::Min30,
        ReminderLead::Hour1,
        ReminderLead::Hour2,
        ReminderLead::Day1,
    ];

    /// Minutes before the deadline; 0 means no reminder
    pub fn minutes(self) -> u32 {
        match self {
            ReminderLead::NoReminder => 0,
            ReminderLead::Min5 => 5,
            ReminderLead::Min10 => 10,
            ReminderLead::Min15 => 15,
            ReminderLead::Min30 => 30,
            ReminderLead::Hour1 => 60,
            ReminderLead::Hour2 => 120,
            ReminderLead::Day1 => 1440,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReminderLead::NoReminder => "No reminder",
            ReminderLead::Min5 => "5 minutes before",
            ReminderLead::Min10 => "10 minutes before",
            ReminderLead::Min15 => "15 minutes before",
            ReminderLead::Min30 => "30 minutes before",
            ReminderLead::Hour1 => "1 hour before",
            ReminderLead::Hour2 => "2 hours before",
            ReminderLead::Day1 => "1 day before",
        }
    }

    /// The next option in the fixed list, wrapping around (editor cycling)
    pub fn next(self) -> ReminderLead {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl From<u32> for ReminderLead {
    /// Offsets outside the fixed set decode as "no reminder" rather than
    /// failing the whole snapshot load.
    fn from(minutes: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|l| l.minutes() == minutes)
            .unwrap_or(ReminderLead::NoReminder)
    }
}

impl From<ReminderLead> for u32 {
    fn from(lead: ReminderLead) -> u32 {
        lead.minutes()
    }
}

/// A task. Field names serialize in the data file's camelCase shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable id, generated client-side (`t1`, `t2`, …). Empty means
    /// "not yet assigned" — the store assigns one on first save.
    #[serde(default)]
    pub id: String,
    /// Required non-empty at save time; empty only while a new task is
    /// still being edited
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Deadline
    #[serde(default)]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(default, rename = "reminderTime")]
    pub reminder: ReminderLead,
    pub category_id: String,
    #[serde(default)]
    pub checked: bool,
}

impl Task {
    /// A fresh, unsaved task draft in the given category (empty title,
    /// no id — both filled in on save)
    pub fn draft(category_id: impl Into<String>) -> Self {
        Task {
            id: String::new(),
            title: String::new(),
            description: None,
            date_time: None,
            reminder: ReminderLead::NoReminder,
            category_id: category_id.into(),
            checked: false,
        }
    }

    /// A reminder lead without a deadline is meaningless — clear it
    pub fn normalize_reminder(&mut self) {
        if self.date_time.is_none() {
            self.reminder = ReminderLead::NoReminder;
        }
    }
}
