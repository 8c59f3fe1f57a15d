//! Greeter Demo
//!
//! Wires two components into a Slack module and feeds it request bodies read
//! from stdin, one JSON document per line. Each dispatch outcome is printed as
//! JSON on stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! export SLACK_BOT_TOKEN=xoxb-... SLACK_SIGNING_SECRET=...
//! echo '{"type":"event_callback","event":{"type":"message","text":"hello","user":"U1"}}' \
//!     | cargo run --package greeter -- --log-level debug
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use clap::Parser;
use serde_json::{Value, json};
use slackmod::prelude::*;
use slackmod::{ConfigLoader, LogOutput, LoggingBuilder};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

// ============================================================================
// Components
// ============================================================================

struct Greeter {
    greeting: String,
}

#[slack_handlers]
impl Greeter {
    #[message("hello")]
    async fn on_hello(&self, cx: Arc<SlackContext>) -> String {
        match cx.event().user_id() {
            Some(user) => format!("{}, <@{user}>!", self.greeting),
            None => format!("{}!", self.greeting),
        }
    }

    #[event("app_mention")]
    async fn on_mention(&self, cx: Arc<SlackContext>) {
        cx.say("You rang?");
    }
}

#[derive(Default)]
struct Deployments {
    started: AtomicUsize,
}

#[slack_handlers]
impl Deployments {
    #[command("/deploy")]
    async fn on_deploy(&self, cx: Arc<SlackContext>) -> Result<()> {
        let target = cx.text().map(str::trim).unwrap_or_default();
        if target.is_empty() {
            cx.ack(Some(json!({ "text": "usage: /deploy <environment>" })));
            return Ok(());
        }
        if target.contains(char::is_whitespace) {
            anyhow::bail!("environment names cannot contain spaces: {target:?}");
        }

        let n = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        cx.ack(None);
        cx.say(format!("Deploy #{n} to {target} started"));
        Ok(())
    }

    #[action(pattern = "^approve_")]
    #[shortcut("deploy_status")]
    async fn on_approve(&self, cx: Arc<SlackContext>) {
        cx.ack(None);
        let n = self.started.load(Ordering::SeqCst);
        cx.say(format!("{n} deploy(s) so far"));
    }

    #[middleware]
    async fn log_requests(&self, cx: Arc<SlackContext>, next: Next) -> HandlerResult {
        info!(
            kind = %cx.event().kind(),
            key = cx.event().routing_key().unwrap_or_default(),
            "Inbound request"
        );
        next.run(cx).await
    }
}

// ============================================================================
// Command line
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "greeter", about = "Dispatch Slack request bodies read from stdin")]
struct Cli {
    /// Log level for the app and the Slack client (debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// Use socket mode (requires SLACK_APP_TOKEN instead of SLACK_SIGNING_SECRET).
    #[arg(long)]
    socket_mode: bool,

    /// Configuration file to load instead of searching for slack.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingBuilder::new()
        .with_log_level(cli.log_level)
        .output(LogOutput::Stderr)
        .init();

    let container = Container::new();
    container.component(Greeter {
        greeting: "Hi there".into(),
    });
    container.component(Deployments::default());

    let mut options = SlackModuleOptions::new().log_level(cli.log_level);
    if cli.socket_mode {
        options = options.socket_mode(true);
    }
    let mut loader = ConfigLoader::new().with_current_dir().with_user_config_dir();
    if let Some(path) = cli.config {
        loader = loader.file(path);
    }

    let module = SlackModule::for_root(options)
        .config_loader(loader)
        .build(&container)
        .await?;
    module.on_application_bootstrap()?;

    let app = container.resolve::<App>()?;
    info!(
        listeners = app.listener_count(),
        middleware = app.middleware_count(),
        "Reading request bodies from stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let body: Value = match serde_json::from_str(line) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Skipping malformed JSON");
                continue;
            }
        };
        let Some(event) = SlackEvent::from_envelope(body) else {
            warn!("Skipping unrecognized request body");
            continue;
        };

        match app.dispatch(event).await {
            Ok(outcome) => println!("{}", serde_json::to_string(&outcome)?),
            Err(e) => error!(error = %e, "Dispatch failed"),
        }
    }

    Ok(())
}
