use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::api::job::{JobService, ServiceError};
use crate::greenhouse;

/// Greenhouse job board ingestion and browsing
#[derive(Parser, Debug)]
#[command(name = "job-intel", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run migrations and start the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Fetch a board's jobs and upsert them
    Ingest {
        /// Board slug or board URL
        board: String,
    },

    /// Print stored jobs, newest first
    List {
        #[arg(long, default_value_t = 200)]
        limit: i64,

        /// Case-insensitive match on title, company or description
        #[arg(long)]
        keyword: Option<String>,
    },

    /// Print one stored job as JSON
    Show { id: Uuid },

    /// Print the board slug an input resolves to
    Resolve { input: String },
}

impl Command {
    /// True when the command needs no configuration, store or network
    pub fn is_offline(&self) -> bool {
        matches!(self, Command::Resolve { .. })
    }
}

/// Run a command that needs no configuration and print its result
pub fn run_offline(command: &Command) -> Result<(), ServiceError> {
    if let Command::Resolve { input } = command {
        println!("{}", greenhouse::resolve(input)?);
    }
    Ok(())
}

/// Run a one-shot command and print its result to stdout
pub async fn run(command: Command, service: &JobService) -> Result<(), ServiceError> {
    match command {
        Command::Serve | Command::Migrate => {}
        Command::Resolve { .. } => run_offline(&command)?,
        Command::Ingest { board } => {
            let report = service.ingest(&board).await?;
            println!("Using board: {}", report.board);
            println!("Fetched {} jobs from Greenhouse.", report.fetched);
            println!("Upserted {} records (insert/update).", report.upserted);
            if !report.preview.is_empty() {
                println!();
                println!("Preview (first {}):", report.preview.len());
                for job in &report.preview {
                    println!(
                        "  {} | {} | {} | {} | {}",
                        job.company,
                        job.title,
                        job.location,
                        job.posted_at.map(|ts| ts.to_rfc3339()).unwrap_or_default(),
                        job.apply_url
                    );
                }
            }
        }
        Command::List { limit, keyword } => {
            let listing = service.list(limit, keyword.as_deref()).await?;
            if listing.jobs.is_empty() {
                println!("No jobs found yet. Run `job-intel ingest <board>` first.");
            }
            for job in &listing.jobs {
                println!(
                    "{}  {}  {} | {} | {}{}",
                    job.id,
                    job.posted_date().map(|d| d.to_string()).unwrap_or_else(|| "----------".into()),
                    job.company,
                    job.title,
                    job.location,
                    if job.is_remote { " (remote)" } else { "" }
                );
            }
        }
        Command::Show { id } => {
            let detail = service.get_job(id).await?;
            let rendered = serde_json::to_string_pretty(&detail)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
            println!("{}", rendered);
        }
    }

    Ok(())
}
