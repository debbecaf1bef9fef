use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use corpus_tally::{CorpusStore, Pipeline, PipelineConfig, PipelineError, TaggedCorpusReader};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "corpus-tally",
    version,
    about = "Rank brown corpus documents by token count and export CSV tables"
)]
struct Cli {
    /// Defaults to `run` with default flags
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline and write all CSV files
    Run(CommonArgs),

    /// Only make sure both corpora are available locally
    Fetch(CommonArgs),

    /// Print the top documents by token count without writing files
    Stats(CommonArgs),
}

#[derive(Args, Debug, Default)]
struct CommonArgs {
    /// Path to config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the CSV files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// nltk_data-style directory holding `corpora/<name>`
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Number of top documents to keep
    #[arg(long)]
    top_n: Option<usize>,

    /// Never download; fail if a corpus is missing
    #[arg(long)]
    offline: bool,

    /// Extra download attempts after a failed fetch
    #[arg(long)]
    fetch_retries: Option<u32>,

    /// Skip the gutenberg export
    #[arg(long)]
    skip_gutenberg: bool,
}

impl CommonArgs {
    /// Config file values, overridden by any flags given.
    fn to_config(&self) -> Result<PipelineConfig, PipelineError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(top_n) = self.top_n {
            config = config.with_top_n(top_n);
        }
        if let Some(retries) = self.fetch_retries {
            config = config.with_fetch_retries(retries);
        }
        if self.offline {
            config = config.with_offline(true);
        }
        if self.skip_gutenberg {
            config = config.with_skip_gutenberg(true);
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "corpus_tally=debug" } else { "corpus_tally=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_run(args: &CommonArgs) -> Result<(), PipelineError> {
    let config = args.to_config()?;
    let mut store = CorpusStore::from_config(&config);
    let pipeline = Pipeline::new(config)?;
    let report = pipeline.run(&mut store)?;
    println!("{}", report.to_json()?);
    Ok(())
}

fn cmd_fetch(args: &CommonArgs) -> Result<(), PipelineError> {
    let config = args.to_config()?;
    let mut store = CorpusStore::from_config(&config);
    let pipeline = Pipeline::new(config)?;
    let (brown, gutenberg) = pipeline.fetch(&mut store)?;
    println!("{}", brown.display());
    if let Some(path) = gutenberg {
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_stats(args: &CommonArgs) -> Result<(), PipelineError> {
    let config = args.to_config()?;
    let mut store = CorpusStore::from_config(&config);
    let brown_dir = store.ensure_available(&config.brown_corpus)?;
    let pipeline = Pipeline::new(config)?;

    let ranked = pipeline.rank(&TaggedCorpusReader::brown(brown_dir))?;
    println!("{:<6} {:<10} {:>10}", "rank", "text_id", "word_count");
    for (i, doc) in ranked.top(pipeline.config().top_n).iter().enumerate() {
        println!("{:<6} {:<10} {:>10}", i + 1, doc.id, doc.word_count());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Run(CommonArgs::default()));
    let result = match &command {
        Commands::Run(args) => cmd_run(args),
        Commands::Fetch(args) => cmd_fetch(args),
        Commands::Stats(args) => cmd_stats(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                code = %err.code,
                stage = %err.stage,
                doc = err.doc_id.as_deref().unwrap_or("-"),
                "{}",
                err.message
            );
            eprintln!("Error: {}", err);
            if let Some(hint) = &err.hint {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
