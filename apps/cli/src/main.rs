use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use hackpath_core::{
    CatalogRegistry, ConsoleModel, PathSession, Resolution, SessionConfig, TracingObserver,
    UrlTable,
};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "3DS hacking path resolver", long_about = None)]
struct Args {
    /// Session configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the steps for a firmware
    Resolve(Target),
    /// Print the deduplicated download plan for a firmware
    Resources {
        #[command(flatten)]
        target: Target,
        /// URL table file (TOML), merged over the config's [urls]
        #[arg(long)]
        urls: Option<PathBuf>,
    },
    /// Walk the path step by step, listing each step's resources
    Walk {
        #[command(flatten)]
        target: Target,
        /// URL table file (TOML), merged over the config's [urls]
        #[arg(long)]
        urls: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
struct Target {
    /// System firmware, e.g. 11.3.0-36U or 11.3.0
    #[arg(short, long)]
    firmware: Option<String>,

    /// Console model (o3ds, o3dsxl, o2ds, n3ds, n3dsxl, n2dsxl)
    #[arg(short, long)]
    model: Option<String>,

    /// The game cartridge was updated at least once
    #[arg(long)]
    media_updated: bool,

    /// Working directory for downloaded archives
    #[arg(long)]
    hacking_dir: Option<PathBuf>,

    /// SD card mount point
    #[arg(long)]
    sd_card: Option<PathBuf>,
}

fn build_config(path: Option<&PathBuf>, target: &Target) -> Result<SessionConfig> {
    let mut config = match path {
        Some(p) => SessionConfig::load_from_file(p)
            .with_context(|| format!("loading config {}", p.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(fw) = &target.firmware {
        config.firmware = Some(fw.clone());
    }
    if let Some(model) = &target.model {
        config.model = model.parse::<ConsoleModel>()?;
    }
    if target.media_updated {
        config.media_updated = true;
    }
    if let Some(dir) = &target.hacking_dir {
        config.hacking_dir = Some(dir.clone());
    }
    if let Some(dir) = &target.sd_card {
        config.sd_card_dir = Some(dir.clone());
    }
    Ok(config)
}

fn merge_urls(config: &mut SessionConfig, path: Option<&PathBuf>) -> Result<()> {
    if let Some(p) = path {
        let table = UrlTable::load_from_file(p)
            .with_context(|| format!("loading URL table {}", p.display()))?;
        config.urls.merge(table);
    }
    let missing = config.urls.missing();
    if !missing.is_empty() {
        warn!(missing = ?missing.iter().map(|k| k.as_str()).collect::<Vec<_>>(), "URL table incomplete");
    }
    Ok(())
}

fn resolve_session(config: SessionConfig) -> Result<Option<PathSession<TracingObserver>>> {
    let mut session = PathSession::new(config);
    match session.resolve()? {
        Resolution::Resolved(_) => Ok(Some(session)),
        Resolution::Unresolved => Ok(None),
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Resolve(target) => {
            let config = build_config(args.config.as_ref(), &target)?;
            let Some(session) = resolve_session(config)? else {
                println!("No known procedure covers this firmware.");
                return Ok(());
            };
            let path = session.path()?;
            println!("Firmware: {}", path.firmware());
            println!("Browser usable: {}", path.is_browser_usable());
            if !path.is_hackable() {
                println!("This firmware is newer than any known method.");
            }
            if path.is_empty() {
                println!("No procedure is implemented for this firmware yet.");
            }
            for (i, step) in path.steps().iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
        }
        Command::Resources { target, urls } => {
            let mut config = build_config(args.config.as_ref(), &target)?;
            merge_urls(&mut config, urls.as_ref())?;
            let registry = CatalogRegistry::new(config.urls.clone());
            let Some(session) = resolve_session(config)? else {
                println!("No known procedure covers this firmware.");
                return Ok(());
            };
            for res in session.plan_resources(&registry)? {
                println!("{}", res);
            }
        }
        Command::Walk { target, urls } => {
            let mut config = build_config(args.config.as_ref(), &target)?;
            merge_urls(&mut config, urls.as_ref())?;
            let registry = CatalogRegistry::new(config.urls.clone());
            let Some(mut session) = resolve_session(config)? else {
                println!("No known procedure covers this firmware.");
                return Ok(());
            };
            if session.path()?.is_empty() {
                println!("No procedure is implemented for this firmware yet.");
            }
            loop {
                let path = session.path_mut()?;
                let Some(step) = path.current() else {
                    break;
                };
                println!("[{}/{}] {}", path.index() + 1, path.len(), step);
                let resources = path
                    .process(&registry)
                    .and_then(|p| p.required_resources())
                    .unwrap_or_default();
                for res in resources {
                    println!("    {}", res);
                }
                session.advance()?;
            }
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(if args.verbose {
                    tracing::Level::DEBUG.into()
                } else {
                    tracing::Level::INFO.into()
                })
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting hackpath...");

    if let Err(e) = run(args) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
