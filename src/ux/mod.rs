use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use fitplan_gen::errors::FitError;
use fitplan_gen::form::{FormController, FormField};
use fitplan_gen::narration::{Activation, DayCard, PlanView, NARRATION_FAILURE_NOTICE};
use fitplan_gen::render;
use fitplan_gen::service::PlanService;

pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        let ans = s.trim().to_lowercase();
        ans == "y" || ans == "yes"
    } else {
        false
    }
}

/// Reads one line; `None` on EOF or read error.
fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut s = String::new();
    match io::stdin().read_line(&mut s) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(s.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string()),
    }
}

/// Walks every field; Enter keeps the current value, bad input asks again.
pub fn edit_form(form: &mut FormController) {
    println!("\n{}", "Your Details".bold());
    for field in FormField::ALL {
        loop {
            let hint = match (field.options(), field.slider()) {
                (Some(opts), _) => format!(" ({})", opts.join(" / ")),
                (_, Some(r)) => format!(" ({}-{}, step {})", r.min, r.max, r.step),
                _ => String::new(),
            };
            let prompt = format!("{}{} [{}]: ", field.label(), hint.dimmed(), form.value(field));
            let Some(input) = read_line(&prompt) else { return };
            if input.trim().is_empty() {
                break;
            }
            match form.set(field, &input) {
                Ok(()) => break,
                Err(e) => println!("  {}", e.to_string().red()),
            }
        }
    }
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_notice(message: &str) {
    eprintln!("\n{} {}", "!".red().bold(), message.red());
}

/// Plays one day to completion. Failures are reported without waiting for a
/// keypress so a scripted `--narrate` run never blocks on stdin.
pub async fn narrate_once(view: &mut PlanView, day: usize, service: &PlanService) {
    let Some(card) = view.card_mut(day) else {
        print_notice(&format!("There is no day {day} in this plan."));
        return;
    };
    println!("{} {}", "Narrating".bold(), card.day().day);
    match card.activate(service).await {
        Ok(Activation::Started(_)) => card.wait_idle().await,
        Ok(Activation::Stopped) => {}
        Err(e) => print_notice(&failure_notice(&e)),
    }
}

fn failure_notice(e: &FitError) -> String {
    match e {
        FitError::Translation(_) => NARRATION_FAILURE_NOTICE.to_string(),
        other => other.user_message(),
    }
}

/// Keyboard loop: a day number toggles that day's narration, `q` quits.
pub async fn listen(view: &mut PlanView, service: &PlanService) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        for card in view.cards.iter_mut() {
            card.pump_events();
        }
        println!("\n{}", render::render_view(view));
        print!("{} ", "Day number to speak/stop, Enter to refresh, q to quit:".bold());
        let _ = io::stdout().flush();

        let Some(line) = lines.next_line().await? else { break };
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") {
            break;
        }
        if input.is_empty() {
            continue;
        }
        match input.parse::<usize>().ok().and_then(|n| view.card_mut(n)) {
            Some(card) => toggle(card, service, &mut lines).await?,
            None => print_notice(&format!("'{input}' is not a day in this plan.")),
        }
    }
    Ok(())
}

async fn toggle(
    card: &mut DayCard,
    service: &PlanService,
    lines: &mut Lines<BufReader<Stdin>>,
) -> io::Result<()> {
    match card.activate(service).await {
        Ok(Activation::Started(_)) => println!("{} {}", "Speaking".green(), card.day().day),
        Ok(Activation::Stopped) => println!("{} {}", "Stopped".yellow(), card.day().day),
        Err(e) => {
            // blocks until acknowledged
            print_notice(&failure_notice(&e));
            print!("Press Enter to continue ");
            let _ = io::stdout().flush();
            lines.next_line().await?;
        }
    }
    Ok(())
}
