//! `handlehunt` - check which platforms have a profile for a username.

mod output;

use anyhow::{anyhow, Context};
use clap::Parser;
use handlehunt_core::{AppConfig, Username};
use handlehunt_platforms::{PlatformCategory, PlatformFilter, PlatformLoader, PlatformRegistry};
use handlehunt_scanner::{ScanOrchestrator, VerdictKind};
use output::Palette;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Username existence prober
#[derive(Parser, Debug)]
#[command(name = "handlehunt", version)]
#[command(about = "Checks which platforms host a profile for a username")]
struct Args {
    /// Username to search for
    #[arg(required_unless_present = "list_platforms")]
    username: Option<String>,

    /// Search all case combinations of the username (eren, Eren, EREN, ...)
    #[arg(short, long)]
    allcase: bool,

    /// Save results to a JSON file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding platform definition files
    #[arg(long, value_name = "DIR")]
    definitions: Option<PathBuf>,

    /// Only probe the named platform (repeatable)
    #[arg(long = "platform", value_name = "NAME", conflicts_with = "category")]
    platforms: Vec<String>,

    /// Only probe platforms of one category
    #[arg(long, value_name = "CAT")]
    category: Option<PlatformCategory>,

    /// Maximum probes in flight
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Delay after each completed probe, in milliseconds
    #[arg(long, value_name = "MS")]
    pacing_ms: Option<u64>,

    /// List the platform catalog and exit
    #[arg(long)]
    list_platforms: bool,
}

impl Args {
    fn filter(&self) -> PlatformFilter {
        if !self.platforms.is_empty() {
            PlatformFilter::Named(self.platforms.clone())
        } else if let Some(category) = self.category {
            PlatformFilter::Category(category)
        } else {
            PlatformFilter::All
        }
    }

    /// Layer command-line overrides on top of file and environment settings.
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(concurrency) = self.concurrency {
            config.scanning.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.scanning.timeout_secs = timeout;
        }
        if let Some(pacing_ms) = self.pacing_ms {
            config.scanning.pacing_ms = pacing_ms;
        }
        if let Some(dir) = &self.definitions {
            config.catalog.definitions_dir = Some(dir.clone());
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_directives = if verbose {
        "info,handlehunt=debug"
    } else {
        "info,handlehunt=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let palette = Palette::new(io::stderr().is_terminal());
            eprintln!("{} {err:#}", palette.error());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = AppConfig::load_with_env().context("failed to load configuration")?;
    args.apply_to(&mut config);
    config
        .scanning
        .validate()
        .context("invalid scanning settings")?;

    let loader =
        PlatformLoader::from_config(&config.catalog).context("failed to locate platform catalog")?;
    let registry =
        PlatformRegistry::load_from(&loader).context("failed to load platform catalog")?;

    let mut stdout = io::stdout();
    let palette = Palette::new(stdout.is_terminal());
    let info = palette.info();

    if args.list_platforms {
        output::write_platform_list(&mut stdout, &registry)?;
        return Ok(());
    }

    let username = args
        .username
        .as_deref()
        .ok_or_else(|| anyhow!("a username is required"))?;
    let username = Username::new(username)?;

    writeln!(stdout, "{info} Target username: {username}")?;
    if args.allcase {
        writeln!(stdout, "{info} All case combinations will be searched")?;
    }
    if args.verbose {
        writeln!(stdout, "{info} Verbose mode enabled")?;
    }
    writeln!(stdout, "{}", "-".repeat(80))?;

    let orchestrator = ScanOrchestrator::from_config(Arc::new(registry), &config.scanning)?
        .with_filter(args.filter());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                warn!("received Ctrl+C, stopping scan");
                trigger.cancel();
            }
            Err(err) => error!(error = %err, "failed to listen for Ctrl+C"),
        }
    });

    let report = orchestrator
        .run_until_cancelled(username.as_str(), args.allcase, cancel, |outcome| {
            if outcome.kind() == VerdictKind::Found {
                println!("{}", output::found_line(outcome, palette));
            }
        })
        .await?;

    if report.interrupted {
        writeln!(stdout, "\n{info} Search interrupted by user.")?;
    }

    output::write_report(&mut stdout, &report)?;

    if let Some(path) = &args.output {
        output::save_export(path, &report.export())?;
        info!(path = %path.display(), "saved results");
        writeln!(stdout, "{info} Results saved to {}", path.display())?;
    }

    output::write_footer(&mut stdout, &report, palette)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["handlehunt", "eren"]).expect("parse args");
        assert_eq!(args.username.as_deref(), Some("eren"));
        assert!(!args.allcase);
        assert!(args.output.is_none());
        assert_eq!(args.filter(), PlatformFilter::All);
    }

    #[test]
    fn test_parse_short_flags() {
        let args = Args::try_parse_from(["handlehunt", "eren", "-a", "-v", "-o", "out.json"])
            .expect("parse args");
        assert!(args.allcase);
        assert!(args.verbose);
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_username_required_unless_listing() {
        assert!(Args::try_parse_from(["handlehunt"]).is_err());
        let args = Args::try_parse_from(["handlehunt", "--list-platforms"]).expect("parse args");
        assert!(args.list_platforms);
        assert!(args.username.is_none());
    }

    #[test]
    fn test_filters() {
        let args = Args::try_parse_from([
            "handlehunt",
            "eren",
            "--platform",
            "GitHub",
            "--platform",
            "reddit",
        ])
        .expect("parse args");
        assert_eq!(
            args.filter(),
            PlatformFilter::Named(vec!["GitHub".to_string(), "reddit".to_string()])
        );

        let args = Args::try_parse_from(["handlehunt", "eren", "--category", "developer"])
            .expect("parse args");
        assert_eq!(
            args.filter(),
            PlatformFilter::Category(PlatformCategory::Developer)
        );

        assert!(Args::try_parse_from(["handlehunt", "eren", "--category", "knitting"]).is_err());
        assert!(Args::try_parse_from([
            "handlehunt",
            "eren",
            "--platform",
            "GitHub",
            "--category",
            "social"
        ])
        .is_err());
    }

    #[test]
    fn test_overrides_applied_to_config() {
        let args = Args::try_parse_from([
            "handlehunt",
            "eren",
            "--concurrency",
            "4",
            "--timeout",
            "5",
            "--pacing-ms",
            "0",
            "--definitions",
            "/tmp/defs",
        ])
        .expect("parse args");

        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.scanning.concurrency, 4);
        assert_eq!(config.scanning.timeout_secs, 5);
        assert_eq!(config.scanning.pacing_ms, 0);
        assert_eq!(
            config.catalog.definitions_dir,
            Some(PathBuf::from("/tmp/defs"))
        );
    }
}
