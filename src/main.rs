use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use psalter::SearchBackend;
use psalter::core::config::{self, ResolvedConfig};
use psalter::core::library::Library;
use psalter::core::preferences::load_preferences;
use psalter::core::search::keyword_search;
use psalter::core::state::App;
use psalter::inference::{SearchRequest, build_provider};
use psalter::tools::{colors, scrape};
use psalter::{server, tui};

#[derive(Parser)]
#[command(name = "psalter", about = "Psalm 1 reader with verse and word study")]
struct Args {
    /// Where semantic search questions go
    #[arg(short, long, value_enum, global = true)]
    backend: Option<SearchBackend>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the reader (default)
    Read,
    /// Search the psalm from the command line
    Search {
        query: String,
        /// Ask the model instead of matching words
        #[arg(long)]
        ai: bool,
    },
    /// Serve POST /api/search
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    /// Fetch Ukrainian texts for the English cross references
    FetchRefs {
        #[arg(long, default_value = "data/cross_references.json")]
        input: PathBuf,
        #[arg(long, default_value = "data/cross_references_uk.json")]
        output: PathBuf,
        #[arg(long, default_value = scrape::DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Print the most frequent hex colours of a web page
    Colors {
        #[arg(default_value = colors::DEFAULT_URL)]
        url: String,
        #[arg(long, default_value_t = colors::TOP_N)]
        top: usize,
    },
}

fn init_logging(to_file: bool) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if to_file {
        // The terminal belongs to ratatui; log to psalter.log in the current directory
        if let Ok(log_file) = File::create("psalter.log") {
            let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
        }
    } else {
        let _ = TermLogger::init(
            LevelFilter::Info,
            log_config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        );
    }
}

fn load_library(config: &ResolvedConfig) -> Result<Arc<Library>, Box<dyn Error>> {
    let library = match &config.data_dir {
        Some(dir) => {
            info!("Loading study data from {}", dir.display());
            Library::from_dir(dir)?
        }
        None => Library::embedded()?,
    };
    Ok(Arc::new(library))
}

async fn run_search(config: &ResolvedConfig, query: &str, ai: bool) -> Result<(), Box<dyn Error>> {
    let library = load_library(config)?;
    let psalm = &library.psalm;

    if !ai {
        let hits = keyword_search(psalm, query);
        if hits.is_empty() {
            println!("Нічого не знайдено");
        }
        for id in hits {
            if let Some(verse) = psalm.verse(id) {
                println!("{}: {}", psalm.verse_reference(id), verse.text);
            }
        }
        return Ok(());
    }

    let provider = build_provider(config).ok_or("Server missing API key configuration.")?;
    let request = SearchRequest {
        query: query.to_string(),
        context: psalm.reading_context(),
    };
    let answer = provider.search(&request).await?;
    println!("{}\n", answer.explanation);
    for id in answer.verse_ids {
        if let Some(verse) = psalm.verse(id) {
            println!("{}: {}", psalm.verse_reference(id), verse.text);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let command = args.command.unwrap_or(Command::Read);
    init_logging(matches!(command, Command::Read));

    let file_config = config::load_config().unwrap_or_else(|e| {
        error!("Ignoring config file: {}", e);
        config::PsalterConfig::default()
    });
    let cli_bind = match &command {
        Command::Serve { bind } => bind.as_deref(),
        _ => None,
    };
    let config = config::resolve(&file_config, args.backend, cli_bind);

    match command {
        Command::Read => {
            info!("Psalter starting up with backend: {:?}", config.search_backend);
            let library = load_library(&config)?;
            let app = App::new(library, build_provider(&config), load_preferences().theme);
            tui::run(app)?;
        }
        Command::Search { query, ai } => run_search(&config, &query, ai).await?,
        Command::Serve { .. } => server::serve(&config).await?,
        Command::FetchRefs {
            input,
            output,
            base_url,
        } => {
            let written = scrape::run(&input, &output, &base_url).await?;
            println!("{} references written to {}", written, output.display());
        }
        Command::Colors { url, top } => {
            let lines = colors::run(&url, top).await?;
            if lines.is_empty() {
                println!("no matches");
            }
            for line in lines {
                println!("{line}");
            }
        }
    }
    Ok(())
}
