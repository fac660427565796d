//! Once-a-minute reminder checks.
//!
//! [`ReminderCheck`] holds the matching rules and the "already fired" memory.
//! [`ReminderScheduler`] owns the timer task that drives it; the task only
//! exists while the scheduler is armed.

use std::{collections::HashMap, sync::Arc, time::Duration};

use jiff::{Zoned, civil::Date};
use log::{debug, info};
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use uuid::Uuid;

use crate::models::{assignment::Assignment, time_of_day::TimeOfDay};

pub mod notifier;

use notifier::{Notification, Notifier, Permission};

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

pub trait Clock: Send + Sync {
    fn now(&self) -> Zoned;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// Matches due reminders against a clock reading and fires each at most once per minute.
#[derive(Debug, Default)]
pub struct ReminderCheck {
    fired: HashMap<Uuid, (Date, TimeOfDay)>,
}

impl ReminderCheck {
    /// Runs one check and returns how many notifications were shown.
    pub fn run(&mut self, assignments: &[Assignment], now: &Zoned, notifier: &dyn Notifier) -> usize {
        self.fired
            .retain(|id, _| assignments.iter().any(|a| a.id == *id));

        let slot = (now.date(), TimeOfDay::from_time(now.time()));
        let mut shown = 0;

        for assignment in assignments.iter().filter(|a| a.is_reminder_due(now)) {
            if self.fired.get(&assignment.id) == Some(&slot) {
                debug!("Reminder for {} already fired at {}", assignment.id, slot.1);
                continue;
            }
            self.fired.insert(assignment.id, slot);

            if deliver(notifier, &Notification::due_today(assignment)) {
                info!("Reminder shown for '{}' ({})", assignment.name, assignment.subject);
                shown += 1;
            }
        }

        shown
    }
}

/// Shows the notification if allowed, asking first when the user has not decided.
fn deliver(notifier: &dyn Notifier, notification: &Notification) -> bool {
    let permission = match notifier.permission() {
        Permission::Default => notifier.request_permission(),
        decided => decided,
    };

    match permission {
        Permission::Granted => {
            notifier.show(notification);
            true
        }
        Permission::Denied | Permission::Default => {
            debug!("Notification dropped, permission is {permission:?}");
            false
        }
    }
}

/// Idle until [`arm`](ReminderScheduler::arm)ed; disarmed explicitly or on drop.
pub struct ReminderScheduler {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl ReminderScheduler {
    pub fn new(period: Duration) -> Self {
        Self { period, task: None }
    }

    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    /// Starts the timer. The first check runs immediately, then once per period,
    /// each on a fresh snapshot. Must be called from within a tokio runtime.
    /// Does nothing if already armed.
    pub fn arm<F>(&mut self, snapshot: F, notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>)
    where
        F: Fn() -> Vec<Assignment> + Send + 'static,
    {
        if self.is_armed() {
            return;
        }

        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut check = ReminderCheck::default();

            loop {
                ticker.tick().await;
                let assignments = snapshot();
                let now = clock.now();
                check.run(&assignments, &now, notifier.as_ref());
            }
        }));

        info!("Reminder scheduler armed (every {}s)", period.as_secs());
    }

    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Reminder scheduler disarmed");
        }
    }
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_INTERVAL)
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}
