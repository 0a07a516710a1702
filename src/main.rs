use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fitplan_gen::config::Config;
use fitplan_gen::form::{FormController, SubmitOutcome};
use fitplan_gen::narration::{NarrationSettings, PlanView};
use fitplan_gen::provider;
use fitplan_gen::render::{self, classify, Panel};
use fitplan_gen::service::PlanService;
use fitplan_gen::speech;

mod cli;
mod ux;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {path}"))?,
        None => Config::default(),
    };
    args.apply_to(&mut cfg);

    let api_key = cfg.api_key()?;
    let service = PlanService::new(provider::make_provider(&cfg, api_key)?, &cfg);
    info!(provider = ?cfg.provider, model = service.model(), "ready");

    let mut form = FormController::default();
    for (field, value) in args.form_overrides() {
        form.set(field, &value)
            .with_context(|| format!("invalid {}", field.label()))?;
    }
    if args.interactive {
        ux::edit_form(&mut form);
    }

    loop {
        let pb = ux::spinner("Generating your personalized plan... This might take a moment.");
        let outcome = form.submit(&service).await;
        pb.finish_and_clear();

        print!("{}", render::render_panel(classify(form.plan(), form.is_loading(), form.error())));
        match outcome {
            SubmitOutcome::Success => break,
            SubmitOutcome::Failure(_) if args.interactive && ux::confirm("Edit your details and try again?") => {
                ux::edit_form(&mut form);
            }
            SubmitOutcome::Failure(_) | SubmitOutcome::Discarded => return Ok(ExitCode::FAILURE),
        }
    }

    if args.narrate.is_empty() && !args.listen {
        return Ok(ExitCode::SUCCESS);
    }
    let Some(plan) = form.take_plan() else {
        print!("{}", render::render_panel(Panel::Empty));
        return Ok(ExitCode::FAILURE);
    };

    let engine = speech::default_engine(cfg.speech_command.as_deref());
    let mut view = PlanView::new(plan, &engine, &NarrationSettings::from(&cfg));
    for day in &args.narrate {
        ux::narrate_once(&mut view, *day, &service).await;
    }
    if args.listen {
        ux::listen(&mut view, &service).await?;
    }
    Ok(ExitCode::SUCCESS)
}
