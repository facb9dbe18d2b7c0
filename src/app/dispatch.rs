use crate::cli::{Cli, Commands};
use crate::config::{FileStore, PolicyStore, Settings};
use crate::error::OpeError;
use crate::platform::{self, HostOs};
use crate::resolver::{Resolver, SCHEME};
use crate::workflow::Workflow;
use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use directories::BaseDirs;
use tracing::{debug, info};

use crate::app::status::render_config;

/// Run the command selected on the command line.
pub fn dispatch(cli: Cli, settings: &Settings) -> Result<()> {
    match cli.command {
        None => {
            eprintln!("{}", Cli::command().render_help());
            bail!("expected an {SCHEME}:// URL or a command")
        }
        Some(Commands::Open(args)) => open_url(&args, settings),
        Some(Commands::Install) => install(),
        Some(Commands::Uninstall) => uninstall(),
        Some(Commands::Config) => show_config(settings),
        Some(Commands::Version) => {
            println!("ope {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_url(args: &[String], settings: &Settings) -> Result<()> {
    let Some((raw, rest)) = args.split_first() else {
        bail!("expected an {SCHEME}:// URL");
    };
    if !rest.is_empty() {
        debug!(ignored = ?rest, "extra arguments after URL ignored");
    }

    let resolver = Resolver::new(SCHEME);
    let store = FileStore::from_path(settings.config_path.clone());
    let desktop = platform::detect(HostOs::current(), settings);

    let opened = Workflow::new(&resolver, &store, desktop.as_ref()).handle(raw)?;
    info!(
        path = %opened.path.display(),
        decision = %opened.decision,
        "resolution finished"
    );
    Ok(())
}

fn install() -> Result<()> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let registrar = platform::registrar(HostOs::current(), home_dir()?);
    let location = registrar
        .install(&exe)
        .map_err(|e| OpeError::Registration(format!("{e:#}")))?;

    println!("Installed: {location}");
    println!("URL scheme {SCHEME}:// registered.");
    Ok(())
}

fn uninstall() -> Result<()> {
    let registrar = platform::registrar(HostOs::current(), home_dir()?);
    let removed = registrar
        .uninstall()
        .map_err(|e| OpeError::Registration(format!("{e:#}")))?;

    println!("Removed: {removed}");
    Ok(())
}

fn show_config(settings: &Settings) -> Result<()> {
    let store = FileStore::from_path(settings.config_path.clone());
    let policy = store.load().context("cannot load policy")?;
    println!("{}", render_config(&store.describe(), &policy));
    Ok(())
}

fn home_dir() -> Result<std::path::PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .context("cannot determine the home directory")
}
