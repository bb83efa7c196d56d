//! Unfollow mode CLI logic
//!
//! Loads configuration, wires the session store, platform client and prompt
//! together and runs the pipeline once.

use anyhow::Result;
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{
    EnvFilter, Registry, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use crate::{
    Settings,
    config::{ConfigLoader, drop_empty_exclusions},
    pipeline::{Pipeline, RunOutcome},
    platform::InstagramClient,
    prompt::TerminalPrompt,
    session::SessionStore,
    utils::version,
};

/// Arguments for an unfollow run
#[derive(Debug, Default)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub state_path: Option<PathBuf>,
    pub proxy: Option<String>,
    pub exclude: Vec<String>,
    pub dry_run: bool,
    pub verbose: bool,
}

/// Run the tool once with the given arguments
pub async fn run_unfollow_mode(args: RunArgs) -> Result<()> {
    let log_filter = init_logging(args.verbose);

    let mut settings = ConfigLoader::new().load(args.config.as_deref())?;
    apply_overrides(&mut settings, &args);
    settings.validate()?;
    if let Some(handle) = &log_filter {
        apply_log_level(handle, &settings);
    }

    info!("unfollow-nonfollowers v{}", version::get_version());
    debug!("Effective configuration: {:?}", settings);
    if settings.unfollow.dry_run {
        info!("Dry run: no account will be unfollowed");
    }

    let store = SessionStore::new(&settings.session.state_path);
    let client = InstagramClient::new(&settings.account.username, &settings.network)?
        .with_refresh_hook(Arc::new(store.clone()));
    let prompt = TerminalPrompt;

    match Pipeline::new(&client, &store, &prompt, &settings).run().await {
        Ok(RunOutcome::Completed(report)) => {
            info!(
                "Unfollowed {} accounts, kept {} excluded accounts",
                report.unfollowed.len(),
                report.skipped.len()
            );
            Ok(())
        }
        Ok(RunOutcome::Blocked) => {
            warn!("Run stopped after login: challenge required");
            Ok(())
        }
        Err(e) => {
            error!("Unfollow run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Command line values win over every other source
fn apply_overrides(settings: &mut Settings, args: &RunArgs) {
    if let Some(path) = &args.state_path {
        settings.session.state_path = path.clone();
    }
    if let Some(proxy) = &args.proxy {
        settings.network.proxy_url = Some(proxy.clone());
    }
    if !args.exclude.is_empty() {
        settings.unfollow.exclude = drop_empty_exclusions(args.exclude.clone());
    }
    if args.dry_run {
        settings.unfollow.dry_run = true;
    }
    if args.verbose {
        settings.logging.verbose = true;
    }
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Install the stderr subscriber before configuration is read.
///
/// Returns a handle for switching to the configured level later, or `None`
/// when `RUST_LOG` decides the filter or a subscriber is already installed.
fn init_logging(verbose: bool) -> Option<FilterHandle> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(if verbose { "debug" } else { "info" }), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok()
        .filter(|_| !from_env)
        .map(|_| handle)
}

/// Switch to the level from the loaded settings
fn apply_log_level(handle: &FilterHandle, settings: &Settings) {
    let level = effective_log_level(settings);
    if let Err(e) = handle.reload(EnvFilter::new(&level)) {
        warn!("Failed to apply log level {}: {}", level, e);
    }
}

fn effective_log_level(settings: &Settings) -> String {
    if settings.logging.verbose {
        "debug".to_string()
    } else {
        settings.logging.level.to_lowercase()
    }
}
