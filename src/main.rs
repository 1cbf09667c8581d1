//! Narrative CLI - Project and Resource Store
//!
//! Command-line interface for the Narrative project store.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::info;

use narrative::cli::commands;
use narrative::cli::shell::run_shell;
use narrative::cli::{Cli, Commands};
use narrative::state::{Clipboard, ProjectStore, Session};
use narrative::{NarrativeError, StoreConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let config = StoreConfig::with_root(cli.root.as_deref());
    info!(
        "Narrative v{} using store {}",
        env!("CARGO_PKG_VERSION"),
        config.root.display()
    );

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e
                .downcast_ref::<NarrativeError>()
                .and_then(NarrativeError::recovery_suggestion)
            {
                eprintln!("  {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Option<Commands>, config: &StoreConfig) -> anyhow::Result<()> {
    let store = ProjectStore::new(config);
    store.ensure_root()?;
    let mut session = Session::new(store);

    let Some(cmd) = command else {
        println!("Narrative v{}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for available commands");
        return Ok(());
    };

    match cmd {
        Commands::Projects => commands::list_projects(&session)?,
        Commands::NewProject { name } => commands::create_project(&mut session, &name)?,
        Commands::RenameProject { old, new } => {
            commands::rename_project(&mut session, &old, &new)?
        }
        Commands::DeleteProject { name, yes } => {
            commands::delete_project(&mut session, &name, |q| ask(yes, q))?;
        }
        Commands::List { project, category } => {
            commands::list_resources(&mut session, &project, category)?;
        }
        Commands::Add {
            project,
            category,
            name,
            source,
        } => commands::add_resource(&mut session, &project, category, &name, &source)?,
        Commands::Show {
            project,
            category,
            name,
        } => commands::show_resource(&mut session, &project, category, &name)?,
        Commands::Update {
            project,
            category,
            name,
            source,
        } => commands::update_resource(&mut session, &project, category, &name, &source)?,
        Commands::Rename {
            project,
            category,
            old,
            new,
        } => commands::rename_resource(&mut session, &project, category, &old, &new)?,
        Commands::Delete {
            project,
            category,
            name,
            yes,
        } => {
            commands::delete_resource(&mut session, &project, category, &name, |q| {
                ask(yes, q)
            })?;
        }
        Commands::Remix {
            project,
            items,
            output,
            copy,
        } => {
            let mut clipboard = copy.then(commands::open_clipboard);
            let clipboard = clipboard.as_mut().map(|c| c.as_mut() as &mut dyn Clipboard);
            commands::remix(&mut session, &project, &items, output.as_deref(), clipboard)?;
        }
        Commands::Shell { project } => {
            if let Some(name) = project {
                session.open_project(&name)?;
            }
            let mut clipboard = commands::open_clipboard();
            let stdin = io::stdin();
            run_shell(
                &mut session,
                stdin.lock(),
                &mut io::stdout(),
                clipboard.as_mut(),
            )?;
        }
    }
    Ok(())
}

/// `--yes` skips the prompt.
fn ask(yes: bool, question: &str) -> narrative::Result<bool> {
    if yes {
        return Ok(true);
    }
    commands::confirm(question)
}
