use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flux")]
#[command(about = "Flux CLI - operational commands for the Flux API backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Probe a running server's health endpoint")]
    Health {
        #[arg(long, default_value = "http://127.0.0.1:3000", help = "Server base URL")]
        url: String,
    },

    #[command(about = "Print the resolved application configuration")]
    Config,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Migrate => migrate().await,
        Commands::Health { url } => health(&url, cli.json).await,
        Commands::Config => show_config(),
    }
}

async fn migrate() -> anyhow::Result<()> {
    crate::database::manager::DatabaseManager::migrate()
        .await
        .map_err(|e| anyhow::anyhow!("migration failed: {}", e))?;
    println!("Migrations applied");
    Ok(())
}

async fn health(base_url: &str, json: bool) -> anyhow::Result<()> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let response = reqwest::get(&url).await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let db = body["data"]["database"].as_str().unwrap_or("unknown");
        println!("{} -> {} (database: {})", url, status, db);
    }

    if !status.is_success() {
        anyhow::bail!("server reported {}", status);
    }
    Ok(())
}

fn show_config() -> anyhow::Result<()> {
    // jwt_secret stays out of the printout
    let mut value = serde_json::to_value(crate::config::config())?;
    if let Some(security) = value.get_mut("security") {
        security["jwt_secret"] = serde_json::Value::String("<redacted>".to_string());
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
