use clap::ValueEnum;
use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::time_of_day::{self, TimeOfDay};

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// UUID to identify the assignment
    pub id: Uuid,
    /// Name of the assignment
    pub name: String,
    /// Subject the assignment belongs to
    pub subject: String,
    /// Free-form description, may be empty
    #[serde(default)]
    pub description: String,
    /// Due instant (local date plus hour and minute at creation)
    pub deadline: Timestamp,
    /// Whether the user marked it as done
    #[serde(default)]
    pub completed: bool,
    /// When the assignment was created
    pub created_at: Timestamp,
    /// Color tag
    #[serde(default)]
    pub color: SubjectColor,
    /// Priority
    #[serde(default)]
    pub priority: Priority,
    /// Local time of day to be reminded on the due date
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "time_of_day::deserialize_optional"
    )]
    pub reminder_time: Option<TimeOfDay>,
}

/// Everything the user submits; id, completion and creation time are assigned by the store.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AssignmentDraft {
    pub name: String,
    pub subject: String,
    pub description: String,
    pub deadline: Timestamp,
    pub color: SubjectColor,
    pub priority: Priority,
    pub reminder_time: Option<TimeOfDay>,
}

#[derive(Serialize, Deserialize, ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubjectColor {
    Coral,
    Mint,
    Lavender,
    Peach,
    #[default]
    Sky,
    Rose,
    Sage,
    Amber,
}

#[derive(
    Serialize, Deserialize, ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Assignment {
    pub fn from_draft(draft: AssignmentDraft, created_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            subject: draft.subject,
            description: draft.description,
            deadline: draft.deadline,
            completed: false,
            created_at,
            color: draft.color,
            priority: draft.priority,
            reminder_time: draft.reminder_time,
        }
    }

    /// Case-insensitive match on name, subject or description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.subject.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }

    /// Deadline seen from the time zone of `now`.
    pub fn local_deadline(&self, now: &Zoned) -> Zoned {
        self.deadline.to_zoned(now.time_zone().clone())
    }

    /// True when the assignment is still open, due on the same local day as `now`,
    /// and its reminder time equals `now` truncated to the minute.
    pub fn is_reminder_due(&self, now: &Zoned) -> bool {
        let Some(reminder_time) = self.reminder_time else {
            return false;
        };
        if self.completed {
            return false;
        }

        self.local_deadline(now).date() == now.date()
            && reminder_time == TimeOfDay::from_time(now.time())
    }

    pub fn is_overdue(&self, now: &Zoned) -> bool {
        !self.completed && self.deadline < now.timestamp()
    }
}
