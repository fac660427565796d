use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use colored::*;
use jiff::{Zoned, civil::Date};
use log::info;

use crate::{
    chat::GuidedChat,
    config::{Config, LOG_ENV},
    models::{
        assignment::{Priority, SubjectColor},
        store::Store,
    },
    scheduler::{ReminderScheduler, SystemClock, notifier::TerminalNotifier},
    services::assignments::{
        AddAssignmentParameters, DEFAULT_REMINDER_TIME, ResolveAssignmentError, add_assignment,
        delete_assignment, resolve_assignment, toggle_assignment,
    },
    storage::{Storage, json::JsonFileStorage},
};

mod chat;
mod config;
mod models;
mod scheduler;
mod services;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "remind",
    about = "Track assignments and get reminded on the day they are due"
)]
struct Cli {
    /// Directory where assignments are stored
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List assignments, open ones first
    List {
        /// Only show assignments whose name, subject or description contains this
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a new assignment
    Add {
        /// Assignment name
        name: String,

        /// Subject
        #[arg(short = 'S', long)]
        subject: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Due date (e.g., "2025-03-01")
        #[arg(short, long)]
        due: String,

        /// Due time, HH:MM [default: 23:59]
        #[arg(short, long)]
        time: Option<String>,

        /// Reminder time on the due date, HH:MM [default: 09:00]
        #[arg(short, long, conflicts_with = "no_reminder")]
        reminder: Option<String>,

        /// Do not remind me
        #[arg(long)]
        no_reminder: bool,

        /// Color tag
        #[arg(short, long, value_enum, default_value_t)]
        color: SubjectColor,

        /// Priority
        #[arg(short, long, value_enum, default_value_t)]
        priority: Priority,
    },

    /// Mark an assignment as done, or as not done if it already is
    Done {
        /// Id prefix or name
        assignment: String,
    },

    /// Delete an assignment
    Delete {
        /// Id prefix or name
        assignment: String,
    },

    /// Show a month calendar with the number of assignments due each day
    Calendar {
        /// Month to show (e.g., "2025-03"), defaults to the current month
        #[arg(short, long, conflicts_with = "day")]
        month: Option<String>,

        /// Show the assignments due on this day (e.g., "2025-03-14") instead of the whole month
        #[arg(long)]
        day: Option<String>,
    },

    /// Stay running and show reminders when they are due
    Watch,

    /// Talk to the homework guide
    Chat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn")).init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // Create data directory if it doesn't exist
    std::fs::create_dir_all(&config.data_dir).unwrap_or_else(|e| {
        eprintln!("Error: Failed to create data directory: {}", e);
        std::process::exit(1);
    });

    let storage = JsonFileStorage::new(&config.data_dir);
    let mut store = Store::from_assignments(storage.load());
    let now = Zoned::now();

    match cli.command {
        Some(Commands::List { search }) => list(&store, search.as_deref(), &now),
        None => list(&store, None, &now),
        Some(Commands::Add {
            name,
            subject,
            description,
            due,
            time,
            reminder,
            no_reminder,
            color,
            priority,
        }) => {
            let reminder_time = if no_reminder {
                None
            } else {
                Some(reminder.unwrap_or_else(|| DEFAULT_REMINDER_TIME.to_string()))
            };
            let params = AddAssignmentParameters {
                name,
                subject,
                description,
                due_date: due,
                due_time: time,
                reminder_time,
                color,
                priority,
            };

            match add_assignment(&mut store, &storage, params, &now) {
                Ok(assignment) => {
                    println!("✓ Assignment added: {}", assignment.name);
                    println!("  {}", ui::short_id(&assignment).dimmed());
                    println!("  Due {}", ui::format_deadline(&assignment, &now));
                    if let Some(reminder) = assignment.reminder_time {
                        println!("  Reminder at {} on the due date", reminder);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Done { assignment }) => {
            let id = resolve_or_exit(&store, &assignment);
            match toggle_assignment(&mut store, &storage, id) {
                Ok(Some(assignment)) if assignment.completed => {
                    println!("✓ Assignment completed: {}", assignment.name);
                }
                Ok(Some(assignment)) => {
                    println!("○ Assignment reopened: {}", assignment.name);
                }
                Ok(None) => {}
                Err(e) => {
                    eprintln!("Error: Failed to save assignment: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Delete { assignment }) => {
            let id = resolve_or_exit(&store, &assignment);
            match delete_assignment(&mut store, &storage, id) {
                Ok(Some(assignment)) => println!("✓ Assignment deleted: {}", assignment.name),
                Ok(None) => {}
                Err(e) => {
                    eprintln!("Error: Failed to delete assignment: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Calendar { month, day }) => {
            let selected_day = day.map(|day| match day.trim().parse::<Date>() {
                Ok(date) => date,
                Err(e) => {
                    eprintln!("Error: Invalid day '{}': {}", day, e);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-03-14)");
                    std::process::exit(1);
                }
            });
            let first_of_month = match (month, selected_day) {
                (Some(month), _) => match format!("{}-01", month.trim()).parse::<Date>() {
                    Ok(date) => date,
                    Err(e) => {
                        eprintln!("Error: Invalid month '{}': {}", month, e);
                        eprintln!("\nExpected format: YYYY-MM (e.g., 2025-03)");
                        std::process::exit(1);
                    }
                },
                (None, Some(day)) => day.first_of_month(),
                (None, None) => now.date().first_of_month(),
            };
            calendar(&store, first_of_month, selected_day, &now);
        }
        Some(Commands::Watch) => watch(storage, &config).await,
        Some(Commands::Chat) => chat(&config).await,
    }
}

fn list(store: &Store, search: Option<&str>, now: &Zoned) {
    if store.is_empty() {
        println!("No assignments yet");
        println!("\nAdd one with: remind add 'Essay' -S English -d 2025-03-01");
        return;
    }

    let (to_do, done) = store.counts();
    println!();
    ui::render_stats(to_do, done);

    let mut assignments = store.filter(search.unwrap_or(""));
    if assignments.is_empty() {
        println!(
            "\n  No assignments found for \"{}\"",
            search.unwrap_or_default()
        );
        return;
    }

    Store::sort(&mut assignments);
    let title = match search {
        Some(term) if !term.is_empty() => format!("Search \"{}\"", term),
        _ => String::from("Assignments"),
    };
    ui::render_view_header(&title, assignments.len());
    for assignment in assignments {
        ui::render_assignment(assignment, now);
        println!();
    }
}

fn calendar(store: &Store, first_of_month: Date, selected_day: Option<Date>, now: &Zoned) {
    let tz = now.time_zone();
    let counts = store.counts_by_day(first_of_month.year(), first_of_month.month(), tz);
    ui::render_calendar(first_of_month, &counts, now.date());

    let (title, mut due): (String, Vec<_>) = match selected_day {
        Some(day) => (
            format!("Due {}", day.strftime("%b %-d, %Y")),
            store.due_on(day, tz),
        ),
        None => (
            String::from("Due this month"),
            counts
                .keys()
                .flat_map(|date| store.due_on(*date, tz))
                .collect(),
        ),
    };
    if due.is_empty() {
        match selected_day {
            Some(_) => println!("  No assignments due on this day"),
            None => println!("  No assignments due this month"),
        }
        return;
    }

    Store::sort(&mut due);
    ui::render_section_header(&title);
    for assignment in due {
        ui::render_assignment(assignment, now);
        println!();
    }
}

async fn watch(storage: JsonFileStorage, config: &Config) {
    let notifier = TerminalNotifier::new(config.notifications);
    // Ask before the Ctrl-C handler is installed, so Ctrl-C still quits at the prompt.
    notifier.settle();
    let notifier = Arc::new(notifier);
    let mut scheduler = ReminderScheduler::new(config.check_interval);

    println!(
        "Watching {} for reminders. Press Ctrl-C to stop.",
        storage.path().display()
    );
    scheduler.arm(move || storage.load(), notifier, Arc::new(SystemClock));

    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Error: Failed to listen for Ctrl-C: {}", e);
    }

    scheduler.disarm();
    info!("Stopped watching");
}

async fn chat(config: &Config) {
    let mut chat = GuidedChat::new(rand::rng(), config.chat_delay);
    println!(
        "\n  {}  {}\n",
        "Homework Guide".cyan().bold(),
        "(/quit to leave)".dimmed()
    );
    for message in chat.transcript() {
        ui::render_message(message);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("  {} ", "you   ›".dimmed());
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error: Failed to read input: {}", e);
                break;
            }
            None => break,
        };
        if line.trim() == "/quit" {
            break;
        }

        println!("  {}", "guide is thinking…".dimmed());
        if let Some(reply) = chat.submit(&line).await {
            println!();
            ui::render_message(reply);
        }
    }
}

fn resolve_or_exit(store: &Store, needle: &str) -> uuid::Uuid {
    match resolve_assignment(store, needle) {
        Ok(id) => id,
        Err(ResolveAssignmentError::NotFound(needle)) => {
            eprintln!("Error: Assignment '{}' not found", needle);
            std::process::exit(1);
        }
        Err(ResolveAssignmentError::Ambiguous(names)) => {
            eprintln!("Error: Assignment name is ambiguous. Multiple assignments found:");
            for name in names {
                eprintln!("  - {}", name);
            }
            eprintln!("\nPlease be more specific or use the id.");
            std::process::exit(1);
        }
    }
}
