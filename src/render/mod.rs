use colored::Colorize;

use crate::model::{DayPlan, FitnessPlan};
use crate::narration::{NarrationState, PlanView};

/// The four mutually exclusive things the results area can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Plan(&'a FitnessPlan),
}

/// Loading wins over error, error over content.
pub fn classify<'a>(plan: Option<&'a FitnessPlan>, is_loading: bool, error: Option<&'a str>) -> Panel<'a> {
    if is_loading {
        return Panel::Loading;
    }
    if let Some(e) = error {
        return Panel::Error(e);
    }
    match plan {
        Some(p) => Panel::Plan(p),
        None => Panel::Empty,
    }
}

pub fn render_panel(panel: Panel<'_>) -> String {
    match panel {
        Panel::Loading => format!(
            "{}\n{}\n",
            "Generating your personalized plan...".bold(),
            "This might take a moment.".dimmed()
        ),
        Panel::Error(msg) => format!(
            "{}\n{}\n",
            "Oops! Something went wrong.".red().bold(),
            msg.red()
        ),
        Panel::Empty => format!(
            "{}\n{}\n",
            "Your Fitness Plan Awaits".bold(),
            "Fill out the form to get started.".dimmed()
        ),
        Panel::Plan(plan) => {
            let mut out = String::new();
            for (i, day) in plan.weekly_plan.iter().enumerate() {
                out.push_str(&render_day(i + 1, day, None));
                out.push('\n');
            }
            out.push_str(&render_disclaimer(&plan.disclaimer));
            out
        }
    }
}

/// Like the plan panel, with each card's narration state in its header.
pub fn render_view(view: &PlanView) -> String {
    let mut out = String::new();
    for (i, card) in view.cards.iter().enumerate() {
        out.push_str(&render_day(i + 1, card.day(), Some(card.state())));
        out.push('\n');
    }
    out.push_str(&render_disclaimer(&view.disclaimer));
    out
}

fn narration_badge(state: NarrationState) -> String {
    match state {
        NarrationState::Idle => "[speak]".blue().to_string(),
        NarrationState::Translating => "[translating...]".yellow().to_string(),
        NarrationState::Speaking => "[stop]".red().to_string(),
    }
}

const HEADERS: [&str; 4] = ["Exercise", "Sets", "Reps / Duration", "Rest"];

pub fn render_day(number: usize, day: &DayPlan, narration: Option<NarrationState>) -> String {
    let mut out = format!("{} {}", format!("Day {number}:").dimmed(), day.day.blue().bold());
    if let Some(state) = narration {
        out.push(' ');
        out.push_str(&narration_badge(state));
    }
    out.push('\n');
    out.push_str(&format!("{}\n", day.focus.dimmed()));

    let rows: Vec<[&str; 4]> = day
        .exercises
        .iter()
        .map(|e| [e.name.as_str(), e.sets.as_str(), e.reps_or_duration.as_str(), e.rest.as_str()])
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header = table_line(&HEADERS, &widths);
    out.push_str(&format!("  {}\n", header.to_uppercase().bold()));
    let rule: usize = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    out.push_str(&format!("  {}\n", "-".repeat(rule)));
    for row in &rows {
        out.push_str(&format!("  {}\n", table_line(row, &widths)));
    }
    out
}

fn table_line(cells: &[&str; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c:<w$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn render_disclaimer(text: &str) -> String {
    format!("{}\n{}\n", "Disclaimer".yellow().bold(), text)
}
