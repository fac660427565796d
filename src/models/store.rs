use std::collections::BTreeMap;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use uuid::Uuid;

use crate::models::assignment::{Assignment, AssignmentDraft};

/// In-memory collection of assignments. Storage order carries no meaning;
/// views always go through [`Store::sort`].
#[derive(Debug, Default, Clone)]
pub struct Store {
    assignments: Vec<Assignment>,
}

impl Store {
    pub fn from_assignments(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    /// Assigns a fresh id and creation time and appends the assignment.
    pub fn add(&mut self, draft: AssignmentDraft, now: Timestamp) -> &Assignment {
        self.assignments.push(Assignment::from_draft(draft, now));
        &self.assignments[self.assignments.len() - 1]
    }

    /// Flips `completed`. Unknown ids are ignored.
    pub fn toggle_complete(&mut self, id: Uuid) -> Option<&Assignment> {
        let assignment = self.assignments.iter_mut().find(|a| a.id == id)?;
        assignment.completed = !assignment.completed;
        Some(assignment)
    }

    /// Removes the assignment. Unknown ids are ignored.
    pub fn delete(&mut self, id: Uuid) -> Option<Assignment> {
        let index = self.assignments.iter().position(|a| a.id == id)?;
        Some(self.assignments.remove(index))
    }

    pub fn filter(&self, term: &str) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.matches(term)).collect()
    }

    /// Open assignments first, then by deadline. Stable.
    pub fn sort(entities: &mut [&Assignment]) {
        entities.sort_by(|a, b| {
            a.completed
                .cmp(&b.completed)
                .then_with(|| a.deadline.cmp(&b.deadline))
        });
    }

    /// (to do, done)
    pub fn counts(&self) -> (usize, usize) {
        let done = self.assignments.iter().filter(|a| a.completed).count();
        (self.assignments.len() - done, done)
    }

    pub fn due_on(&self, date: Date, tz: &TimeZone) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.deadline.to_zoned(tz.clone()).date() == date)
            .collect()
    }

    /// Number of assignments due on each day of the given month, keyed by date.
    /// Days without assignments are absent.
    pub fn counts_by_day(&self, year: i16, month: i8, tz: &TimeZone) -> BTreeMap<Date, usize> {
        let mut counts = BTreeMap::new();
        for assignment in &self.assignments {
            let date = assignment.deadline.to_zoned(tz.clone()).date();
            if date.year() == year && date.month() == month {
                *counts.entry(date).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use jiff::civil::date;

    use super::*;
    use crate::models::assignment::{Priority, SubjectColor};

    fn deadline(day: i8, hour: i8) -> Timestamp {
        date(2024, 6, day)
            .at(hour, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp()
    }

    fn draft(name: &str, day: i8) -> AssignmentDraft {
        AssignmentDraft {
            name: name.to_string(),
            subject: String::from("Math"),
            deadline: deadline(day, 12),
            ..AssignmentDraft::default()
        }
    }

    #[test]
    fn test_add_assigns_unique_ids_and_keeps_fields() {
        let mut store = Store::default();
        let now = Timestamp::now();
        let submitted = AssignmentDraft {
            name: String::from("Essay"),
            subject: String::from("English"),
            description: String::from("Draft first"),
            deadline: deadline(1, 23),
            color: SubjectColor::Coral,
            priority: Priority::High,
            reminder_time: "09:00".parse().ok(),
        };

        let added = store.add(submitted.clone(), now).clone();
        for i in 0..20 {
            store.add(draft(&format!("Task {i}"), 3), now);
        }

        let ids: HashSet<_> = store.assignments().iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 21);

        assert_eq!(added.name, submitted.name);
        assert_eq!(added.subject, submitted.subject);
        assert_eq!(added.description, submitted.description);
        assert_eq!(added.deadline, submitted.deadline);
        assert_eq!(added.color, submitted.color);
        assert_eq!(added.priority, submitted.priority);
        assert_eq!(added.reminder_time, submitted.reminder_time);
        assert!(!added.completed);
        assert_eq!(added.created_at, now);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut store = Store::default();
        let id = store.add(draft("Essay", 1), Timestamp::now()).id;

        assert!(store.toggle_complete(id).unwrap().completed);
        assert!(!store.toggle_complete(id).unwrap().completed);
    }

    #[test]
    fn test_toggle_and_delete_unknown_id_are_noops() {
        let mut store = Store::default();
        store.add(draft("Essay", 1), Timestamp::now());
        let before = store.assignments().to_vec();

        assert!(store.toggle_complete(Uuid::new_v4()).is_none());
        assert!(store.delete(Uuid::new_v4()).is_none());
        assert_eq!(store.assignments(), before.as_slice());
    }

    #[test]
    fn test_delete_removes_only_the_match() {
        let mut store = Store::default();
        let keep = store.add(draft("Keep", 1), Timestamp::now()).id;
        let remove = store.add(draft("Remove", 2), Timestamp::now()).id;

        let removed = store.delete(remove).unwrap();
        assert_eq!(removed.name, "Remove");
        assert_eq!(store.assignments().len(), 1);
        assert!(store.get(keep).is_some());
    }

    #[test]
    fn test_filter_empty_term_returns_everything() {
        let mut store = Store::default();
        for day in 1..=5 {
            store.add(draft(&format!("Task {day}"), day), Timestamp::now());
        }
        assert_eq!(store.filter("").len(), 5);
    }

    #[test]
    fn test_filter_matches_any_text_field() {
        let mut store = Store::default();
        store.add(
            AssignmentDraft {
                description: String::from("Read chapter 4"),
                ..draft("Worksheet", 1)
            },
            Timestamp::now(),
        );
        store.add(draft("Essay", 2), Timestamp::now());

        assert_eq!(store.filter("CHAPTER").len(), 1);
        assert_eq!(store.filter("math").len(), 2);
        assert!(store.filter("physics").is_empty());
    }

    #[test]
    fn test_sort_open_first_then_by_deadline() {
        let mut store = Store::default();
        let now = Timestamp::now();
        let late_done = store.add(draft("late done", 9), now).id;
        store.add(draft("late open", 8), now);
        let early_done = store.add(draft("early done", 1), now).id;
        store.add(draft("early open", 2), now);
        store.add(draft("middle open", 5), now);
        store.toggle_complete(late_done);
        store.toggle_complete(early_done);

        let mut sorted = store.filter("");
        Store::sort(&mut sorted);

        let names: Vec<_> = sorted.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["early open", "middle open", "late open", "early done", "late done"]
        );

        let first_done = sorted.iter().position(|a| a.completed).unwrap();
        assert!(sorted[..first_done].iter().all(|a| !a.completed));
        assert!(sorted[first_done..].iter().all(|a| a.completed));
        for group in [&sorted[..first_done], &sorted[first_done..]] {
            assert!(group.windows(2).all(|w| w[0].deadline <= w[1].deadline));
        }
    }

    #[test]
    fn test_sort_is_stable_for_equal_deadlines() {
        let mut store = Store::default();
        let now = Timestamp::now();
        store.add(draft("first", 3), now);
        store.add(draft("second", 3), now);
        store.add(draft("third", 3), now);

        let mut sorted = store.filter("");
        Store::sort(&mut sorted);
        let names: Vec<_> = sorted.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_counts_and_calendar_grouping() {
        let mut store = Store::default();
        let now = Timestamp::now();
        let done = store.add(draft("a", 1), now).id;
        store.add(draft("b", 1), now);
        store.add(draft("c", 15), now);
        store.add(AssignmentDraft {
            deadline: date(2024, 7, 1)
                .at(12, 0, 0, 0)
                .to_zoned(TimeZone::UTC)
                .unwrap()
                .timestamp(),
            ..draft("d", 1)
        }, now);
        store.toggle_complete(done);

        assert_eq!(store.counts(), (3, 1));

        let counts = store.counts_by_day(2024, 6, &TimeZone::UTC);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&date(2024, 6, 1)], 2);
        assert_eq!(counts[&date(2024, 6, 15)], 1);

        assert_eq!(store.due_on(date(2024, 6, 1), &TimeZone::UTC).len(), 2);
        assert!(store.due_on(date(2024, 6, 2), &TimeZone::UTC).is_empty());
    }

    #[test]
    fn test_due_on_uses_the_local_day() {
        let mut store = Store::default();
        let now = Timestamp::now();
        let late = store.add(AssignmentDraft {
            deadline: deadline(1, 23),
            ..draft("late", 1)
        }, now).id;
        store.add(draft("noon", 2), now);

        let plus_two = TimeZone::fixed(jiff::tz::offset(2));
        let due: Vec<_> = store.due_on(date(2024, 6, 2), &plus_two).iter().map(|a| a.id).collect();
        assert_eq!(due.len(), 2);
        assert!(due.contains(&late));
        assert!(store.due_on(date(2024, 6, 1), &plus_two).is_empty());
    }
}
