use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, enrich};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "anitrakt")]
#[command(about = "Anitrakt - enrich MAL anime lists with Trakt and Letterboxd ids")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long = "output-format", global = true, default_value = "human", value_enum)]
    output_format: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich MAL input lists with canonical Trakt records
    #[command(
        long_about = "Enrich one or both MAL input batches with canonical Trakt records and Letterboxd cross-references. Existing output records and ledgered not-found keys are skipped unless --force is set."
    )]
    Enrich {
        /// TV input list (MAL-sourced JSON)
        #[arg(long, value_name = "FILE")]
        tv: Option<PathBuf>,

        /// Movie input list (MAL-sourced JSON)
        #[arg(long, value_name = "FILE")]
        movies: Option<PathBuf>,

        /// Output file (defaults to json/output/<input-stem>_ex.json)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Trakt API key (falls back to TRAKT_API_KEY, then prompts)
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,

        /// Refetch everything, ignoring existing output and the not-found ledger
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,

        /// Disable the progress bar
        #[arg(long, action = ArgAction::SetTrue)]
        no_progress: bool,
    },
    /// Clear the response cache
    #[command(
        long_about = "Wipe the response cache directory, including the persistent Letterboxd entries. Volatile entries are cleared automatically at the end of every enrich run."
    )]
    Clear {
        /// Clear the response cache
        #[arg(long, action = ArgAction::SetTrue)]
        cache: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output_format, cli.quiet);

    match cli.command {
        Commands::Enrich {
            tv,
            movies,
            output: output_file,
            api_key,
            force,
            no_progress,
        } => {
            let args = enrich::EnrichArgs {
                tv,
                movies,
                output: output_file,
                api_key,
                force,
                no_progress,
            };
            enrich::run_enrich(args, &output).await
        }
        Commands::Clear { cache } => clear::run_clear(cache, &output).await,
    }
}
