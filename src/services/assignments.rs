use jiff::{Zoned, civil::Date};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        assignment::{Assignment, AssignmentDraft, Priority, SubjectColor},
        store::Store,
        time_of_day::{TimeOfDay, TimeOfDayError},
    },
    storage::{Storage, StorageError},
};

pub const DEFAULT_DUE_TIME: &str = "23:59";
pub const DEFAULT_REMINDER_TIME: &str = "09:00";

#[derive(Debug, Error)]
pub enum AddAssignmentError {
    #[error("Assignment name is required")]
    MissingName,

    #[error("Subject is required")]
    MissingSubject,

    #[error("Invalid due date '{0}': {1}")]
    InvalidDueDate(String, String),

    #[error("Invalid due time: {0}")]
    InvalidDueTime(TimeOfDayError),

    #[error("Invalid reminder time: {0}")]
    InvalidReminderTime(TimeOfDayError),

    #[error("Due date {0} does not exist in the local time zone: {1}")]
    InvalidDeadline(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Raw form input, validated before anything reaches the store.
pub struct AddAssignmentParameters {
    pub name: String,
    pub subject: String,
    pub description: Option<String>,
    pub due_date: String,
    pub due_time: Option<String>,
    pub reminder_time: Option<String>,
    pub color: SubjectColor,
    pub priority: Priority,
}

impl AddAssignmentParameters {
    /// Turns the form input into a draft, deadline resolved in the time zone of `now`.
    pub fn into_draft(self, now: &Zoned) -> Result<AssignmentDraft, AddAssignmentError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AddAssignmentError::MissingName);
        }
        let subject = self.subject.trim().to_string();
        if subject.is_empty() {
            return Err(AddAssignmentError::MissingSubject);
        }

        let due_date = self
            .due_date
            .trim()
            .parse::<Date>()
            .map_err(|e| AddAssignmentError::InvalidDueDate(self.due_date.clone(), e.to_string()))?;
        let due_time = self
            .due_time
            .as_deref()
            .unwrap_or(DEFAULT_DUE_TIME)
            .parse::<TimeOfDay>()
            .map_err(AddAssignmentError::InvalidDueTime)?;
        let reminder_time = self
            .reminder_time
            .as_deref()
            .map(str::parse::<TimeOfDay>)
            .transpose()
            .map_err(AddAssignmentError::InvalidReminderTime)?;

        let deadline = due_date
            .to_datetime(due_time.to_time())
            .to_zoned(now.time_zone().clone())
            .map_err(|e| AddAssignmentError::InvalidDeadline(due_date.to_string(), e.to_string()))?
            .timestamp();

        Ok(AssignmentDraft {
            name,
            subject,
            description: self.description.unwrap_or_default(),
            deadline,
            color: self.color,
            priority: self.priority,
            reminder_time,
        })
    }
}

pub fn add_assignment(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddAssignmentParameters,
    now: &Zoned,
) -> Result<Assignment, AddAssignmentError> {
    let draft = parameters.into_draft(now)?;
    let assignment = store.add(draft, now.timestamp()).clone();

    storage.save(store.assignments())?;

    Ok(assignment)
}

#[derive(Debug, Error)]
pub enum StoreMutationError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Flips completion and writes through. Returns `None` when the id is unknown.
pub fn toggle_assignment(
    store: &mut Store,
    storage: &impl Storage,
    id: Uuid,
) -> Result<Option<Assignment>, StoreMutationError> {
    let Some(assignment) = store.toggle_complete(id).cloned() else {
        return Ok(None);
    };

    storage.save(store.assignments())?;

    Ok(Some(assignment))
}

/// Removes the assignment and writes through. Returns `None` when the id is unknown.
pub fn delete_assignment(
    store: &mut Store,
    storage: &impl Storage,
    id: Uuid,
) -> Result<Option<Assignment>, StoreMutationError> {
    let Some(assignment) = store.delete(id) else {
        return Ok(None);
    };

    storage.save(store.assignments())?;

    Ok(Some(assignment))
}

#[derive(Debug, Error)]
pub enum ResolveAssignmentError {
    #[error("Assignment '{0}' not found")]
    NotFound(String),

    #[error("Assignment name is ambiguous. Multiple assignments found: {}", .0.join(", "))]
    Ambiguous(Vec<String>),
}

/// Shortest id prefix that is matched against ids. Shorter needles only match names.
pub const MIN_ID_PREFIX_LEN: usize = 4;

/// Finds an assignment by exact name, then by id prefix or partial name.
///
/// Names are compared case-insensitively. If the id prefix and the partial
/// name point at different assignments, the needle is ambiguous.
pub fn resolve_assignment(store: &Store, needle: &str) -> Result<Uuid, ResolveAssignmentError> {
    let needle = needle.trim();
    if needle.is_empty() {
        return Err(ResolveAssignmentError::NotFound(needle.to_string()));
    }
    let lowered = needle.to_lowercase();

    let exact: Vec<_> = store
        .assignments()
        .iter()
        .filter(|a| a.name.to_lowercase() == lowered)
        .collect();
    match exact.len() {
        0 => {}
        1 => return Ok(exact[0].id),
        _ => return Err(ResolveAssignmentError::Ambiguous(names_of(&exact))),
    }

    let by_id_prefix = lowered.chars().count() >= MIN_ID_PREFIX_LEN;
    let candidates: Vec<_> = store
        .assignments()
        .iter()
        .filter(|a| {
            (by_id_prefix && a.id.to_string().starts_with(&lowered))
                || a.name.to_lowercase().contains(&lowered)
        })
        .collect();

    match candidates.len() {
        0 => Err(ResolveAssignmentError::NotFound(needle.to_string())),
        1 => Ok(candidates[0].id),
        _ => Err(ResolveAssignmentError::Ambiguous(names_of(&candidates))),
    }
}

fn names_of(matches: &[&Assignment]) -> Vec<String> {
    matches.iter().map(|a| a.name.clone()).collect()
}
