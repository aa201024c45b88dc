use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use serde::Serialize;

use rs_mail_dashboard::api::HttpMailService;
use rs_mail_dashboard::auth::login;
use rs_mail_dashboard::config::{Config, load_config};
use rs_mail_dashboard::dashboard::category_view::{self, CategoryGroup};
use rs_mail_dashboard::dashboard::state::DashboardState;
use rs_mail_dashboard::domain::category::Category;
use rs_mail_dashboard::session::{self, SessionTracker};
use rs_mail_dashboard::sync::{CycleReport, SyncOrchestrator};
use rs_mail_dashboard::terminal::run_dashboard;

#[derive(Parser)]
#[command(name = "rs_mail_dashboard")]
#[command(about = "Meetings, recent emails and categorized mail at a glance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in through the browser, then open the dashboard
    Login,

    /// Open the dashboard for the user named in a redirect URL
    Dashboard {
        /// URL carrying `?user_id=...` (as sent after sign-in)
        #[arg(long)]
        url: Option<String>,
    },

    /// Run one sync cycle and print the resulting dashboard as JSON
    Sync {
        #[arg(long)]
        url: String,
    },
}

#[derive(Serialize)]
struct SyncOutput {
    identity: String,
    report: CycleReport,
    dashboard: DashboardState,
    categories: Vec<CategoryGroup>,
}

fn orchestrator(cfg: &Config) -> Result<SyncOrchestrator<HttpMailService>> {
    let service = HttpMailService::new(&cfg.base_url, cfg.request_timeout())?;
    Ok(SyncOrchestrator::new(service))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    let mut tracker = SessionTracker::new();

    match cli.cmd {
        Command::Login => {
            let identity = login::sign_in(&cfg.base_url, cfg.redirect_addr()?, cfg.login_timeout())?;
            println!("Signed in as {identity}");
            run_dashboard(tracker.observe(Some(identity)), orchestrator(&cfg)?)
        }

        Command::Dashboard { url } => {
            let identity = url.as_deref().and_then(session::resolve_str);
            run_dashboard(tracker.observe(identity), orchestrator(&cfg)?)
        }

        Command::Sync { url } => {
            let Some(ctx) = tracker.observe(session::resolve_str(&url)) else {
                eprintln!("No user_id in {url}; nothing to sync. Run: rs_mail_dashboard login");
                return Ok(());
            };
            let orch = orchestrator(&cfg)?;
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let report = rt.block_on(orch.run_session(&ctx));

            let dashboard = ctx.dashboard.snapshot();
            let out = SyncOutput {
                identity: ctx.identity.to_string(),
                report,
                categories: category_view::project(dashboard.classification(), &Category::ALL),
                dashboard,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
    }
}
