use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tasktracker_core::task::Task;
use tasktracker_service::{LocalService, TaskService};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tasktracker_server::config::ServerConfig;

#[derive(Parser)]
#[command(name = "tasktracker-server")]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (the default)
    Serve,
    /// Print this month's completed and carried-forward tasks
    Summary,
    /// Print tasks due by today plus everything carried forward
    Pending,
}

fn print_tasks(heading: &str, tasks: &[Task]) {
    println!("{heading}");
    if tasks.is_empty() {
        println!("  (none)\n");
        return;
    }
    println!("  {:<6} {:<12} {:<16} TITLE", "ID", "DUE", "STATE");
    for task in tasks {
        println!(
            "  {:<6} {:<12} {:<16} {}",
            task.id,
            task.due_date,
            task.state().display_name(),
            task.title,
        );
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let db = tasktracker_db::open_database(&cli.config.db_config()).await?;
    let service = LocalService::new(db).with_timezone(cli.config.timezone);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Summary => {
            let summary = service.monthly_summary().await?;
            println!("Summary for {}\n", summary.month.label());
            print_tasks("Completed", &summary.completed);
            print_tasks("Carried forward", &summary.carried_forward);
        }
        Commands::Pending => {
            let board = service.task_board().await?;
            print_tasks(&format!("Due by {}", board.today), &board.pending);
            print_tasks("Carried forward", &board.carried_forward);
        }
        Commands::Serve => {
            let addr = cli.config.addr();
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(
                %addr,
                backend = %cli.config.db_backend,
                timezone = %cli.config.timezone,
                "tasktracker-server listening"
            );
            tasktracker_server::serve(listener, Arc::new(service)).await?;
        }
    }

    Ok(())
}
