//! Valocker CLI - manage the agent pool of an instalocking helper.

use clap::Parser;
use std::path::Path;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use valocker::action_log;
use valocker::cli::{
    Cli, Commands, PoolTarget, ProfileCommands, RosterCommands, SnapshotCommands,
};
use valocker::commands::{self, CommandResult, Session};
use valocker::config::{DataPaths, OutputFormat, Settings, resolve_output_format};

/// Environment variable holding the tracing filter.
const LOG_ENV: &str = "VALOCKER_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let paths = match DataPaths::resolve() {
        Ok(resolved) => {
            tracing::debug!(
                root = %resolved.value.root().display(),
                source = %resolved.source,
                "data directory resolved"
            );
            resolved.value
        }
        Err(e) => {
            report_error(&e, cli.human_readable);
            process::exit(1);
        }
    };

    // Unreadable settings surface later through the session; formatting
    // falls back to the default here.
    let settings = Settings::load(&paths.settings()).unwrap_or_default();
    let human = resolve_output_format(cli.human_readable, &settings).value == OutputFormat::Human;

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, cli.roster.as_deref(), &paths, human);
    let duration = start.elapsed().as_millis() as u64;

    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };
    action_log::log_action(&paths, &cmd_name, args_json, success, error, duration);

    if let Err(e) = result {
        report_error(&e, human);
        process::exit(1);
    }
}

/// Log to stderr, filtered by `VALOCKER_LOG` (default: warnings only).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn report_error(e: &valocker::Error, human: bool) {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
}

fn run_command(
    command: Option<Commands>,
    roster: Option<&Path>,
    paths: &DataPaths,
    human: bool,
) -> Result<(), valocker::Error> {
    // Emitting the built-in roster needs no profile.
    if let Some(Commands::Roster {
        command: Some(RosterCommands::Emit),
    }) = command
    {
        output(&commands::roster_emit(), human);
        return Ok(());
    }

    let mut session = Session::open(paths.clone(), roster)?;

    match command {
        None | Some(Commands::Status) => {
            let result = commands::status(&session)?;
            output(&result, human);
        }

        Some(Commands::Roster { .. }) => {
            let result = commands::roster(&session)?;
            output(&result, human);
        }

        Some(Commands::Unlock { agents, all }) => {
            let result = commands::set_available(&mut session, &agents, all, true)?;
            output(&result, human);
        }

        Some(Commands::Lock { agents, all }) => {
            let result = commands::set_available(&mut session, &agents, all, false)?;
            output(&result, human);
        }

        Some(Commands::Select { target }) => {
            let result = select(&mut session, &target, true)?;
            output(&result, human);
        }

        Some(Commands::Deselect { target }) => {
            let result = select(&mut session, &target, false)?;
            output(&result, human);
        }

        Some(Commands::Pick { agent }) => {
            let result = commands::pick(&mut session, agent.as_deref())?;
            output(&result, human);
        }

        Some(Commands::Random { state }) => {
            let result = commands::random(&mut session, state.is_on())?;
            output(&result, human);
        }

        Some(Commands::Profile { command }) => match command {
            ProfileCommands::List => {
                let result = commands::profile_list(&session)?;
                output(&result, human);
            }
            ProfileCommands::Create { name, activate } => {
                let result = commands::profile_create(&mut session, &name, activate)?;
                output(&result, human);
            }
            ProfileCommands::Activate { name } => {
                let result = commands::profile_activate(&mut session, &name)?;
                output(&result, human);
            }
            ProfileCommands::Delete { name } => {
                let result = commands::profile_delete(&mut session, &name)?;
                output(&result, human);
            }
            ProfileCommands::Favorite { name } => {
                let result = commands::profile_favorite(&mut session, &name, true)?;
                output(&result, human);
            }
            ProfileCommands::Unfavorite { name } => {
                let result = commands::profile_favorite(&mut session, &name, false)?;
                output(&result, human);
            }
        },

        Some(Commands::Snapshot { command }) => match command {
            SnapshotCommands::Export => {
                let result = commands::snapshot_export(&session)?;
                output(&result, human);
            }
            SnapshotCommands::Import { file } => {
                let result = commands::snapshot_import(&mut session, &file)?;
                output(&result, human);
            }
        },
    }

    session.close()
}

fn select(
    session: &mut Session,
    target: &PoolTarget,
    value: bool,
) -> Result<commands::ChangeResult, valocker::Error> {
    commands::set_selected(session, &target.agents, &target.role, target.all, value)
}

/// Print output in JSON or human-readable format.
fn output<T: CommandResult>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Command name and arguments for the action log.
fn serialize_command(command: &Option<Commands>) -> (String, serde_json::Value) {
    match command {
        None | Some(Commands::Status) => ("status".to_string(), serde_json::json!({})),

        Some(Commands::Roster { command }) => match command {
            Some(RosterCommands::Emit) => ("roster emit".to_string(), serde_json::json!({})),
            _ => ("roster".to_string(), serde_json::json!({})),
        },

        Some(Commands::Unlock { agents, all }) => (
            "unlock".to_string(),
            serde_json::json!({ "agents": agents, "all": all }),
        ),

        Some(Commands::Lock { agents, all }) => (
            "lock".to_string(),
            serde_json::json!({ "agents": agents, "all": all }),
        ),

        Some(Commands::Select { target }) => (
            "select".to_string(),
            serde_json::json!({ "agents": target.agents, "role": target.role, "all": target.all }),
        ),

        Some(Commands::Deselect { target }) => (
            "deselect".to_string(),
            serde_json::json!({ "agents": target.agents, "role": target.role, "all": target.all }),
        ),

        Some(Commands::Pick { agent }) => {
            ("pick".to_string(), serde_json::json!({ "agent": agent }))
        }

        Some(Commands::Random { state }) => (
            "random".to_string(),
            serde_json::json!({ "on": state.is_on() }),
        ),

        Some(Commands::Profile { command }) => match command {
            ProfileCommands::List => ("profile list".to_string(), serde_json::json!({})),
            ProfileCommands::Create { name, activate } => (
                "profile create".to_string(),
                serde_json::json!({ "name": name, "activate": activate }),
            ),
            ProfileCommands::Activate { name } => (
                "profile activate".to_string(),
                serde_json::json!({ "name": name }),
            ),
            ProfileCommands::Delete { name } => (
                "profile delete".to_string(),
                serde_json::json!({ "name": name }),
            ),
            ProfileCommands::Favorite { name } => (
                "profile favorite".to_string(),
                serde_json::json!({ "name": name }),
            ),
            ProfileCommands::Unfavorite { name } => (
                "profile unfavorite".to_string(),
                serde_json::json!({ "name": name }),
            ),
        },

        Some(Commands::Snapshot { command }) => match command {
            SnapshotCommands::Export => ("snapshot export".to_string(), serde_json::json!({})),
            SnapshotCommands::Import { file } => (
                "snapshot import".to_string(),
                serde_json::json!({ "file": file.display().to_string() }),
            ),
        },
    }
}
