//! Administrative entry point of the Agenda authorization engine.
//!
//! Every subcommand loads the configuration, connects to the database and
//! initializes the engine (migrations, and startup reconciliation when
//! enabled) before doing its own work. Results are printed to stdout as JSON.

mod config;
mod logging;

use std::path::PathBuf;

use agenda_security::SecurityContext;
use anyhow::Context;
use authz_engine::{AuthzEngine, AuthzEngineConfig};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "agenda-server", version, about = "Agenda authorization engine administration")]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `database.url` from the configuration.
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply schema migrations and exit.
    Migrate,
    /// Synchronize the capability table with the registry.
    Reconcile,
    /// Give every principal the defaults of its role type.
    AssignPermissions,
    /// Reset every persisted role to the defaults of its type.
    SyncRoleDefaults,
    /// Print the persisted capabilities.
    ListCapabilities {
        /// Only names starting with this prefix.
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Print the persisted roles.
    ListRoles,
    /// Add a capability to a principal's direct set.
    Grant {
        #[arg(long)]
        principal: Uuid,
        #[arg(long)]
        capability: String,
    },
    /// Remove a capability from a principal's direct set.
    Revoke {
        #[arg(long)]
        principal: Uuid,
        #[arg(long)]
        capability: String,
    },
    /// Ask the decision point whether a principal holds a capability.
    Check {
        #[arg(long)]
        principal: Uuid,
        #[arg(long)]
        capability: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        cfg.database.url = url;
    }
    logging::init(&cfg.logging)?;

    run(cli.command, cfg).await
}

async fn run(command: Command, cfg: AppConfig) -> anyhow::Result<()> {
    let db = authz_engine::connect(&cfg.database)
        .await
        .context("failed to connect to the database")?;

    if matches!(command, Command::Migrate) {
        authz_engine::migrate(&db)
            .await
            .context("migrations failed")?;
        info!("migrations applied");
        return Ok(());
    }

    // An explicit reconcile must not run twice through the startup hook.
    let authz_cfg = AuthzEngineConfig {
        reconcile_on_startup: cfg.authz.reconcile_on_startup
            && !matches!(command, Command::Reconcile),
        ..cfg.authz
    };
    let engine = AuthzEngine::init(&authz_cfg, db).await?;
    let admin = engine.admin();

    match command {
        Command::Migrate => Ok(()),
        Command::Reconcile => print_json(&admin.reconcile_capabilities().await?),
        Command::AssignPermissions => print_json(&admin.assign_role_permissions().await?),
        Command::SyncRoleDefaults => print_json(&admin.sync_role_defaults().await?),
        Command::ListCapabilities { prefix } => {
            let mut capabilities = admin.list_capabilities().await?;
            if let Some(prefix) = prefix {
                capabilities.retain(|c| c.name.starts_with(&prefix));
            }
            print_json(&capabilities)
        }
        Command::ListRoles => print_json(&admin.list_roles().await?),
        Command::Grant {
            principal,
            capability,
        } => {
            admin.grant(principal, &capability).await?;
            print_json(&admin.get_principal(principal).await?)
        }
        Command::Revoke {
            principal,
            capability,
        } => {
            admin.revoke(principal, &capability).await?;
            print_json(&admin.get_principal(principal).await?)
        }
        Command::Check {
            principal,
            capability,
        } => {
            let ctx = SecurityContext::for_subject(principal);
            let allowed = engine.client().is_authorized(&ctx, &capability).await?;
            print_json(&serde_json::json!({
                "principal": principal,
                "capability": capability,
                "allowed": allowed,
            }))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
