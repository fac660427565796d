use std::collections::BTreeMap;

use colored::*;
use jiff::{Zoned, civil::Date};

use crate::{
    chat::{Message, Role},
    models::assignment::{Assignment, Priority, SubjectColor},
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Paint text with the assignment's color tag
pub fn paint(text: &str, color: SubjectColor) -> ColoredString {
    match color {
        SubjectColor::Coral => text.truecolor(255, 127, 80),
        SubjectColor::Mint => text.truecolor(62, 180, 137),
        SubjectColor::Lavender => text.truecolor(181, 126, 220),
        SubjectColor::Peach => text.truecolor(255, 180, 128),
        SubjectColor::Sky => text.truecolor(86, 180, 233),
        SubjectColor::Rose => text.truecolor(255, 102, 153),
        SubjectColor::Sage => text.truecolor(138, 154, 91),
        SubjectColor::Amber => text.truecolor(255, 191, 0),
    }
}

fn priority_badge(priority: Priority) -> ColoredString {
    let label = priority.label();
    match priority {
        Priority::High => label.red().bold(),
        Priority::Medium => label.yellow(),
        Priority::Low => label.dimmed(),
    }
}

fn get_status_glyph(assignment: &Assignment, is_overdue: bool) -> ColoredString {
    if assignment.completed {
        "✓".green()
    } else if is_overdue {
        "●".red()
    } else {
        "○".normal()
    }
}

/// Short id users can type back into `done` and `delete`
pub fn short_id(assignment: &Assignment) -> String {
    assignment.id.to_string().chars().take(8).collect()
}

/// Format a deadline like "Jun 1, 2024 at 9:05 AM"
pub fn format_deadline(assignment: &Assignment, now: &Zoned) -> String {
    assignment
        .local_deadline(now)
        .strftime("%b %-d, %Y at %-I:%M %p")
        .to_string()
}

/// Render one assignment: id, glyph, name and right-aligned subject,
/// then a dimmed detail line
pub fn render_assignment(assignment: &Assignment, now: &Zoned) {
    let terminal_width = get_terminal_width();
    let is_overdue = assignment.is_overdue(now);

    let id_str = short_id(assignment);
    let glyph = get_status_glyph(assignment, is_overdue);
    let left_section = format!("  {}  {}  {}", id_str, glyph, assignment.name);
    let styled_left = if assignment.completed {
        left_section.dimmed().strikethrough()
    } else {
        left_section.bold()
    };

    let left_visible_len = format!("  {}  {}  {}", id_str, " ", assignment.name)
        .chars()
        .count();
    let right_visible_len = assignment.subject.chars().count();
    let total_content = left_visible_len + right_visible_len;

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!(
            "{}{}{}",
            styled_left,
            " ".repeat(padding),
            paint(&assignment.subject, assignment.color)
        );
    } else {
        println!(
            "{}  {}",
            styled_left,
            paint(&assignment.subject, assignment.color)
        );
    }

    let due = format!("Due {}", format_deadline(assignment, now));
    let due = if is_overdue { due.red() } else { due.dimmed() };
    let mut details = vec![due.to_string(), priority_badge(assignment.priority).to_string()];
    if let Some(reminder) = assignment.reminder_time {
        details.push(format!("⏰ {reminder}").dimmed().to_string());
    }
    println!("       {}", details.join(&format!(" {} ", "•".dimmed())));

    if !assignment.description.is_empty() {
        println!("       {}", assignment.description.italic().dimmed());
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let word = if count == 1 { "assignment" } else { "assignments" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, word);
}

/// Render the to-do / done counters shown above the list
pub fn render_stats(to_do: usize, done: usize) {
    println!(
        "  {} {}   {} {}",
        to_do.to_string().bold(),
        "To Do".dimmed(),
        done.to_string().green().bold(),
        "Done".dimmed()
    );
}

/// Render a section header (e.g., "Due this month")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

const CALENDAR_CELL_WIDTH: usize = 7;

/// Day number with its due count, padded to a fixed width. Counts above 9 show as `9+`.
fn calendar_cell(day: i8, count: Option<usize>) -> String {
    let cell = match count {
        Some(count) if count > 9 => format!("{day:>2}(9+)"),
        Some(count) => format!("{day:>2}({count})"),
        None => format!("{day:>2}"),
    };
    format!("{cell:<width$}", width = CALENDAR_CELL_WIDTH)
}

/// Render a month grid, Sunday first, with the number of assignments due
/// next to each day that has any. Today is highlighted.
pub fn render_calendar(first_of_month: Date, counts: &BTreeMap<Date, usize>, today: Date) {
    println!(
        "\n  {}\n",
        first_of_month.strftime("%B %Y").to_string().cyan().bold()
    );
    println!(
        "  {}",
        ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
            .map(|d| format!("{d:<width$}", width = CALENDAR_CELL_WIDTH))
            .join("")
            .dimmed()
    );

    let offset = first_of_month.weekday().to_sunday_zero_offset() as usize;
    let mut line = " ".repeat(CALENDAR_CELL_WIDTH * offset);
    let mut column = offset;

    for day in 1..=first_of_month.days_in_month() {
        let date = first_of_month.with().day(day).build().unwrap_or(first_of_month);
        let cell = calendar_cell(day, counts.get(&date).copied());
        let cell = if date == today {
            cell.reversed().to_string()
        } else if counts.contains_key(&date) {
            cell.blue().bold().to_string()
        } else {
            cell
        };
        line.push_str(&cell);
        column += 1;

        if column == 7 {
            println!("  {}", line);
            line.clear();
            column = 0;
        }
    }

    if !line.is_empty() {
        println!("  {}", line);
    }
    println!();
}

/// Render a chat message
pub fn render_message(message: &Message) {
    match message.role {
        Role::Assistant => println!("  {} {}\n", "guide ›".blue().bold(), message.content),
        Role::User => println!("  {} {}\n", "you   ›".dimmed(), message.content),
    }
}
