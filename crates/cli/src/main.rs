mod echo;

use std::{process::ExitCode, sync::Arc};

use anyhow::{Result, bail};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};
use triage_bot_core::{
    config::{BotConfig, EnvInputs, InputSource},
    log::TracingLog,
};
use triage_bot_dispatch::{Bot, Collaborators, Dispatcher, RunOutcome};
use triage_bot_github::{OctocrabFactory, OctocrabIdentity, TrackingIssueReporter, webhook};

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::builder()
        // Default to info level
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    match run().await {
        Ok(RunOutcome::Failed) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:?}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunOutcome> {
    let config = BotConfig::load()?;
    let event = webhook::load_event_context()?;
    let bot = select_bot()?;
    tracing::info!(
        "Dispatching {:?} on {} (issue {:?}) as bot {}",
        event.kind,
        event.repo,
        event.issue_number,
        bot.id()
    );

    let inputs = Arc::new(EnvInputs);
    let collab = Collaborators {
        inputs: inputs.clone(),
        clients: Arc::new(OctocrabFactory::new(event.repo.clone())),
        reporter: Arc::new(TrackingIssueReporter::new(
            config.error_report_issue.clone(),
            inputs.clone() as Arc<dyn InputSource>,
        )),
        telemetry: triage_bot_telemetry::from_config(config.telemetry.as_ref()),
        identity: Arc::new(OctocrabIdentity::new(inputs as Arc<dyn InputSource>)),
        log: Arc::new(TracingLog),
    };
    let dispatcher = Dispatcher::new(bot, event, config.error_report_issue, collab);
    Ok(dispatcher.run().await)
}

/// Look up the concrete bot named by `TRIAGE_BOT`. The built-in `echo` bot
/// exists so the wiring can be exercised end to end before a real bot is
/// pointed at a repository.
fn select_bot() -> Result<Arc<dyn Bot>> {
    let name = std::env::var("TRIAGE_BOT").unwrap_or_else(|_| "echo".to_string());
    match name.as_str() {
        "echo" => Ok(Arc::new(echo::EchoBot)),
        other => bail!("Unknown bot: {other}"),
    }
}
