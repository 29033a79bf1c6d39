use clap::Parser;
use localvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Environment variable controlling log verbosity (e.g. `localvault=debug`).
const LOG_ENV: &str = "LOCALVAULT_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => localvault::cli::commands::init::execute(&cli),
        Commands::Status => localvault::cli::commands::status::execute(&cli),
        Commands::Add {
            ref title,
            ref note,
        } => localvault::cli::commands::add::execute(&cli, title, note),
        Commands::List => localvault::cli::commands::list::execute(&cli),
        Commands::Show { ref id } => localvault::cli::commands::show::execute(&cli, id),
        Commands::Edit {
            ref id,
            ref title,
            ref note,
            secret,
        } => localvault::cli::commands::edit::execute(
            &cli,
            id,
            title.as_deref(),
            note.as_deref(),
            secret,
        ),
        Commands::Delete { ref id, force } => {
            localvault::cli::commands::delete::execute(&cli, id, force)
        }
        Commands::Export { ref output } => localvault::cli::commands::export::execute(&cli, output),
        Commands::Import { ref file } => localvault::cli::commands::import_cmd::execute(&cli, file),
        Commands::Reset { force } => localvault::cli::commands::reset::execute(&cli, force),
    };

    if let Err(e) = result {
        localvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for `show`.  Quiet by default.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
