use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::database::{bootstrap, PgStore};
use crate::models::Role;
use crate::{app, AppState};

#[derive(Parser)]
#[command(name = "medic-server")]
#[command(about = "Medic Server - users, hospitals, doctors and appointments over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Listen port, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Create collections and indexes, then exit")]
    InitIndexes,

    #[command(about = "Grant a role (e.g. admin) to the user with this e-mail")]
    GrantRole {
        #[arg(help = "E-mail of an existing user")]
        email: String,
        #[arg(help = "customer, doctor, hospital_owner or admin")]
        role: Role,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::InitIndexes => {
            let store = PgStore::connect(&config.database).await.context("connecting to database")?;
            bootstrap(&store).await.context("creating collections and indexes")?;
            info!("Collections and indexes are in place");
            Ok(())
        }
        Commands::GrantRole { email, role } => {
            let store = PgStore::connect(&config.database).await.context("connecting to database")?;
            let state = AppState::new(config, Arc::new(store));
            let user = state.users.grant_role_by_email(&email, role).await?;
            println!("{} now has roles: {:?}", user.email, user.roles);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let store = PgStore::connect(&config.database).await.context("connecting to database")?;
    bootstrap(&store).await.context("creating collections and indexes")?;

    let port = port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Medic server listening on http://{} ({:?})", bind_addr, config.environment);

    let state = AppState::new(config, Arc::new(store));
    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["medic-server"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["medic-server", "serve", "--port", "9090"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(9090) })));

        let cli = Cli::try_parse_from(["medic-server", "init-indexes"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::InitIndexes)));
    }

    #[test]
    fn grant_role_parses_wire_names() {
        let cli = Cli::try_parse_from(["medic-server", "grant-role", "ada@obi.ng", "admin"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::GrantRole { ref email, role: Role::Admin }) if email == "ada@obi.ng"));

        assert!(Cli::try_parse_from(["medic-server", "grant-role", "ada@obi.ng", "root"]).is_err());
    }
}
