use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use festival_scrape::config::{CrawlConfig, PROGRAMME_NAMES};
use festival_scrape::crawl::Crawler;
use festival_scrape::fetch::HttpFetcher;
use festival_scrape::logging::init_logging;
use festival_scrape::write_json;

/// Crawl the TIFF programme pages into a single JSON file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Where to write the collected films
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seconds to wait before each film page request
    #[arg(long)]
    delay_secs: Option<u64>,

    /// Site origin that programme links are resolved against
    #[arg(long)]
    origin: Option<String>,

    /// Prefix of the schedule feed; the film's object id is appended
    #[arg(long)]
    schedule_endpoint: Option<String>,

    /// Only crawl these programmes (repeatable)
    #[arg(short, long = "programme")]
    programmes: Vec<String>,

    /// Print the known programme names and exit
    #[arg(long)]
    list_programmes: bool,
}

fn build_config(args: Args) -> Result<CrawlConfig, Box<dyn std::error::Error>> {
    let mut config = CrawlConfig::default().select_programmes(&args.programmes)?;
    if let Some(origin) = args.origin {
        config = config.with_origin(&origin)?;
    }
    if let Some(endpoint) = args.schedule_endpoint {
        config.schedule_endpoint = endpoint;
    }
    if let Some(secs) = args.delay_secs {
        config.detail_delay = Duration::from_secs(secs);
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    Ok(config)
}

async fn run(config: CrawlConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder().cookie_store(true).build()?;
    let crawler = Crawler::new(HttpFetcher::new(client), config);

    let movies = crawler.run().await?;
    write_json(&movies, &crawler.config().output)?;
    tracing::info!(
        "wrote {} films to {}",
        movies.movies.len(),
        crawler.config().output.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if args.list_programmes {
        for name in PROGRAMME_NAMES {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    init_logging();

    let config = match build_config(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => {
            tracing::info!("Success");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("crawl failed: {e}");
            ExitCode::FAILURE
        }
    }
}
