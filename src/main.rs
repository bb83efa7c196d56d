//! Command-line interface for unfollow-nonfollowers
//!
//! # Usage
//!
//! ```bash
//! IG_USERNAME=me IG_PASSWORD=secret unfollow-nonfollowers
//! unfollow-nonfollowers --exclude bot --exclude shop --dry-run
//! unfollow-nonfollowers --config ~/.config/unfollow-nonfollowers/config.toml --verbose
//! ```

use clap::Parser;
use std::path::PathBuf;

use unfollow_nonfollowers::cli::{RunArgs, run_unfollow_mode};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "unfollow-nonfollowers")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to cache the session between runs
    #[arg(short, long, value_name = "FILE")]
    state_path: Option<PathBuf>,

    /// Proxy server URL (http://host:port, socks5://host:port, etc.)
    #[arg(short, long, value_name = "PROXY")]
    proxy: Option<String>,

    /// Never unfollow usernames containing this text (repeatable)
    #[arg(short, long, value_name = "TEXT")]
    exclude: Vec<String>,

    /// List who would be unfollowed without unfollowing anyone
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    run_unfollow_mode(RunArgs {
        config: cli.config,
        state_path: cli.state_path,
        proxy: cli.proxy,
        exclude: cli.exclude,
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    })
    .await
}
