//! Volunteer registry daemon: command-line entry point over an LMDB store.

mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use volunteer_registry::{GroupPayload, LeavePayload, MemberPayload, Registry, RegistryError};
use volunteer_store_lmdb::integrity::{check_data_dir, check_integrity};
use volunteer_store_lmdb::LmdbEnvironment;
use volunteer_types::{Principal, SystemClock};

use crate::config::DaemonConfig;
use crate::logging::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "volunteer-daemon", about = "Volunteer group registry")]
struct Cli {
    /// Data directory for registry storage.
    #[arg(long, env = "VOLUNTEER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// LMDB map size in MiB.
    #[arg(long, env = "VOLUNTEER_MAP_SIZE_MB")]
    map_size_mb: Option<usize>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VOLUNTEER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VOLUNTEER_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Register a new group.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        country: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        service: String,
    },
    /// List every registered group.
    Groups,
    /// Look up a group by name.
    Group { name: String },
    /// Look up the group filed under a service.
    Service {
        service: String,
        /// Return every group filed under the service.
        #[arg(long)]
        all: bool,
    },
    /// Look up the group filed under a country.
    Location {
        country: String,
        /// Return every group filed under the country.
        #[arg(long)]
        all: bool,
    },
    /// Join a group as the calling principal.
    Volunteer {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        specialist: String,
        #[arg(long)]
        group: String,
        /// Caller identity, supplied by the hosting environment.
        #[arg(long, env = "VOLUNTEER_PRINCIPAL")]
        principal: String,
    },
    /// Leave a group.
    Leave {
        #[arg(long)]
        name: String,
        /// Identity captured when the member joined.
        #[arg(long, env = "VOLUNTEER_PRINCIPAL")]
        principal: String,
        #[arg(long)]
        group: String,
    },
    /// List every advertised service.
    Services,
    /// List every country with a registered group.
    Locations,
    /// Run storage integrity and index consistency checks.
    Check,
}

fn load_config(cli: &Cli) -> anyhow::Result<DaemonConfig> {
    let file_config = match cli.config {
        Some(ref path) => DaemonConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DaemonConfig::default(),
    };

    Ok(DaemonConfig {
        data_dir: cli.data_dir.clone().unwrap_or(file_config.data_dir),
        map_size_mb: cli.map_size_mb.unwrap_or(file_config.map_size_mb),
        log_format: cli.log_format.clone().unwrap_or(file_config.log_format),
        log_level: cli.log_level.clone().unwrap_or(file_config.log_level),
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn registry_error(e: RegistryError) -> anyhow::Error {
    anyhow::anyhow!("{}: {}", e.kind(), e)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format: LogFormat = config
        .log_format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    init_logging(format, &config.log_level);

    check_data_dir(&config.data_dir).map_err(|e| anyhow::anyhow!(e))?;
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening registry at {}", config.data_dir.display()))?;
    tracing::debug!(data_dir = %config.data_dir.display(), "registry opened");

    let registry = Registry::new(env, SystemClock);

    match cli.command {
        Command::Register {
            name,
            country,
            contact,
            email,
            service,
        } => {
            let payload = GroupPayload {
                name,
                country,
                contact_number: contact,
                official_email: email,
                service,
            };
            println!("{}", registry.register_group(&payload).map_err(registry_error)?);
        }
        Command::Groups => print_json(&registry.get_all_groups().map_err(registry_error)?)?,
        Command::Group { name } => {
            print_json(&registry.get_group_by_name(&name).map_err(registry_error)?)?
        }
        Command::Service { service, all } => {
            if all {
                print_json(&registry.get_groups_by_service(&service).map_err(registry_error)?)?
            } else {
                print_json(&registry.get_group_by_service(&service).map_err(registry_error)?)?
            }
        }
        Command::Location { country, all } => {
            if all {
                print_json(&registry.get_groups_by_location(&country).map_err(registry_error)?)?
            } else {
                print_json(&registry.get_group_by_location(&country).map_err(registry_error)?)?
            }
        }
        Command::Volunteer {
            name,
            location,
            specialist,
            group,
            principal,
        } => {
            let payload = MemberPayload {
                name,
                location,
                specialist,
                group_name: group,
            };
            let caller = Principal::from(principal);
            println!(
                "{}",
                registry.volunteer(&payload, &caller).map_err(registry_error)?
            );
        }
        Command::Leave {
            name,
            principal,
            group,
        } => {
            let payload = LeavePayload {
                name,
                registration_id: principal.into(),
                group_name: group,
            };
            println!(
                "{}",
                registry.member_leave_group(&payload).map_err(registry_error)?
            );
        }
        Command::Services => print_json(&registry.list_all_services().map_err(registry_error)?)?,
        Command::Locations => {
            print_json(&registry.list_all_locations().map_err(registry_error)?)?
        }
        Command::Check => {
            let integrity = check_integrity(registry.store().env())?;
            let consistency = registry.verify_consistency().map_err(registry_error)?;

            println!(
                "databases checked: {}, entries: {}, groups: {}, index keys: {}",
                integrity.databases_checked,
                integrity.total_entries,
                consistency.groups_checked,
                consistency.index_keys_checked,
            );
            for error in integrity.errors.iter().chain(consistency.errors.iter()) {
                println!("  {error}");
            }
            if !integrity.is_healthy() || !consistency.is_consistent() {
                anyhow::bail!("registry check failed");
            }
        }
    }

    Ok(())
}
