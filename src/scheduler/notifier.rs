use std::{
    io::{self, BufRead, IsTerminal, Write},
    str::FromStr,
    sync::{Mutex, MutexGuard},
};

use colored::*;
use log::{info, warn};
use thiserror::Error;

use crate::models::assignment::Assignment;

pub const NOTIFICATION_TITLE: &str = "Remind - Assignment Due";

/// Whether notifications may be shown. `Default` means the user has not decided yet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    #[default]
    Default,
}

#[derive(Debug, Error)]
#[error("Unknown notification permission '{0}', expected granted, denied or default")]
pub struct ParsePermissionError(String);

impl FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "granted" => Ok(Permission::Granted),
            "denied" => Ok(Permission::Denied),
            "default" | "undecided" => Ok(Permission::Default),
            _ => Err(ParsePermissionError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn due_today(assignment: &Assignment) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: format!(
                "\"{}\" for {} is due today!",
                assignment.name, assignment.subject
            ),
        }
    }
}

/// Host capability for showing notifications.
pub trait Notifier: Send + Sync {
    fn permission(&self) -> Permission;

    /// Asks the user to decide. Returns the resulting permission.
    fn request_permission(&self) -> Permission;

    fn show(&self, notification: &Notification);
}

/// Rings the terminal bell and prints a banner on stdout.
///
/// The user is asked once, through [`settle`](TerminalNotifier::settle), before
/// any timer runs. A request from the timer never reads stdin.
pub struct TerminalNotifier {
    permission: Mutex<Permission>,
}

impl TerminalNotifier {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
        }
    }

    /// Asks on the terminal if the user has not decided yet. Blocks on stdin.
    pub fn settle(&self) -> Permission {
        let mut permission = self.lock_permission();
        if *permission == Permission::Default {
            *permission = Self::ask();
            info!("Notification permission set to {:?}", *permission);
        }
        *permission
    }

    fn lock_permission(&self) -> MutexGuard<'_, Permission> {
        self.permission
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ask() -> Permission {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            warn!("Cannot ask for notification permission without a terminal, denying");
            return Permission::Denied;
        }

        print!("Allow reminder notifications? [y/N] ");
        let _ = io::stdout().flush();

        let mut answer = String::new();
        match stdin.lock().read_line(&mut answer) {
            Ok(_) if answer.trim().eq_ignore_ascii_case("y") => Permission::Granted,
            Ok(_) => Permission::Denied,
            Err(e) => {
                warn!("Failed to read permission answer: {e}");
                Permission::Denied
            }
        }
    }
}

impl Notifier for TerminalNotifier {
    fn permission(&self) -> Permission {
        *self.lock_permission()
    }

    fn request_permission(&self) -> Permission {
        let mut permission = self.lock_permission();
        if *permission == Permission::Default {
            warn!("Notification permission was never settled, denying");
            *permission = Permission::Denied;
        }
        *permission
    }

    fn show(&self, notification: &Notification) {
        println!(
            "\x07\n  {} {}\n  {}\n",
            "⏰".yellow(),
            notification.title.bold(),
            notification.body
        );
        let _ = io::stdout().flush();
    }
}
