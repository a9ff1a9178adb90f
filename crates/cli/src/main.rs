use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_app::{fixtures, App};
use shelf_kernel::Settings;

#[derive(Debug, Parser)]
#[command(name = "shelf", version, about = "SHELF authors and books service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate the database and serve the HTTP API
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
    /// Load the demo authors and books
    Seed {
        /// Insert even when authors already exist
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load SHELF settings")?;
    shelf_telemetry::init(&settings.telemetry);

    tracing::info!(env = ?settings.environment, command = ?cli.command, "shelf cli starting");

    match cli.command {
        Command::Serve => App::bootstrap(settings).await?.serve().await,
        Command::Migrate => {
            let app = App::build(settings).await?;
            let applied = app.migrate()?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Seed { force } => {
            let app = App::build(settings).await?;
            app.migrate()?;
            let report = fixtures::seed(app.state(), force).await?;
            println!("{}", serde_json::to_string(&report)?);
            Ok(())
        }
    }
}
