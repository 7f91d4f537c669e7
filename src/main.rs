use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use road_sentiment::app::ports::ChatModel;
use road_sentiment::chat::QaAssistant;
use road_sentiment::common::constants::{CLASSIFIED_FILE, MAP_FILE, RAW_FILE};
use road_sentiment::config::{openai_api_key, reddit_user_agent, Config};
use road_sentiment::domain::EnrichedRecord;
use road_sentiment::infra::csv_store;
use road_sentiment::infra::nominatim::NominatimGeocoder;
use road_sentiment::infra::openai::OpenAiChat;
use road_sentiment::infra::recognizer::RoadTermRecognizer;
use road_sentiment::infra::reddit::RedditClient;
use road_sentiment::observability::logging;
use road_sentiment::pipeline::classify::IssueSentimentClassifier;
use road_sentiment::pipeline::enrich::{sample_records, EnrichmentOrchestrator};
use road_sentiment::pipeline::extract::LocationExtractor;
use road_sentiment::pipeline::filter::filter_records;
use road_sentiment::pipeline::rate_limiter::RateLimiter;
use road_sentiment::pipeline::summary::summarize;
use road_sentiment::render::{geocode_unique, render_map};

#[derive(Parser)]
#[command(name = "road_sentiment")]
#[command(about = "Road condition sentiment pipeline for the Salt Lake City metro area")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch posts and comments into the raw CSV
    Ingest {
        /// Raw output file
        #[arg(long, default_value = RAW_FILE)]
        output: PathBuf,
    },
    /// Filter, sample, and enrich raw records into the classified CSV
    Classify {
        /// Raw input file
        #[arg(long, default_value = RAW_FILE)]
        input: PathBuf,
        /// Classified output file
        #[arg(long, default_value = CLASSIFIED_FILE)]
        output: PathBuf,
        /// Fraction of filtered records to enrich (overrides config)
        #[arg(long)]
        sample_frac: Option<f64>,
    },
    /// Geocode classified records and build the interactive map
    Map {
        /// Classified input file
        #[arg(long, default_value = CLASSIFIED_FILE)]
        input: PathBuf,
        /// Map output file
        #[arg(long, default_value = MAP_FILE)]
        output: PathBuf,
    },
    /// Interactive question-answering over the classified summary
    Chat {
        /// Classified input file
        #[arg(long, default_value = CLASSIFIED_FILE)]
        input: PathBuf,
    },
    /// Run ingest, classify, and map back to back
    Run {
        /// Fraction of filtered records to enrich (overrides config)
        #[arg(long)]
        sample_frac: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Ingest { output } => {
            ingest_stage(&config, &output).await?;
        }
        Commands::Classify {
            input,
            output,
            sample_frac,
        } => {
            classify_stage(&config, &input, &output, sample_frac).await?;
        }
        Commands::Map { input, output } => {
            let records = csv_store::read_enriched(&input)?;
            map_stage(&config, &records, &output).await?;
        }
        Commands::Chat { input } => {
            chat_stage(&config, &input).await?;
        }
        Commands::Run { sample_frac } => {
            println!("🚦 Running full road sentiment pipeline");
            ingest_stage(&config, Path::new(RAW_FILE)).await?;
            let enriched = classify_stage(
                &config,
                Path::new(RAW_FILE),
                Path::new(CLASSIFIED_FILE),
                sample_frac,
            )
            .await?;
            map_stage(&config, &enriched, Path::new(MAP_FILE)).await?;
            println!("✅ Full pipeline completed");
        }
    }
    Ok(())
}

async fn ingest_stage(config: &Config, output: &Path) -> anyhow::Result<()> {
    println!("📥 Ingesting posts and comments...");
    let client = RedditClient::new(reddit_user_agent());
    let records = client
        .fetch_posts_and_comments(&config.ingest.subreddits, config.ingest.post_limit)
        .await?;
    csv_store::write_raw(output, &records)?;
    println!("✅ Saved {} raw records to {}", records.len(), output.display());
    Ok(())
}

async fn classify_stage(
    config: &Config,
    input: &Path,
    output: &Path,
    sample_frac: Option<f64>,
) -> anyhow::Result<Vec<EnrichedRecord>> {
    println!("🧠 Filtering and classifying data...");
    let records = csv_store::read_raw(input)?;

    let filtered = filter_records(
        records,
        config.filter.min_body_len,
        config.filter.min_score,
    );

    let frac = sample_frac.unwrap_or(config.enrich.sample_frac);
    let sampled = sample_records(filtered, frac, config.enrich.sample_seed);
    if frac < 1.0 {
        println!("🎯 Sampled {:.0}% -> {} records", frac * 100.0, sampled.len());
    }

    // Credentials are checked before the batch starts; a missing key is a
    // fatal setup error, not a per-record one.
    let api_key = openai_api_key()?;
    let classify_model: Arc<dyn ChatModel> = Arc::new(OpenAiChat::new(
        api_key.clone(),
        config.llm.model.clone(),
        config.llm.classify_temperature,
    ));
    let extract_model: Arc<dyn ChatModel> = Arc::new(OpenAiChat::new(
        api_key,
        config.llm.model.clone(),
        config.llm.extract_temperature,
    ));

    let classifier = Arc::new(IssueSentimentClassifier::new(classify_model));
    let extractor = Arc::new(LocationExtractor::new(
        Arc::new(RoadTermRecognizer),
        extract_model,
    ));
    let orchestrator = EnrichmentOrchestrator::new(classifier, extractor, config.enrich.workers);

    let enriched = orchestrator.enrich(sampled).await;
    csv_store::write_enriched(output, &enriched)?;
    println!(
        "✅ Saved {} classified records to {}",
        enriched.len(),
        output.display()
    );
    Ok(enriched)
}

async fn map_stage(
    config: &Config,
    records: &[EnrichedRecord],
    output: &Path,
) -> anyhow::Result<()> {
    println!("🗺️  Geocoding and building interactive map...");
    let limiter = RateLimiter::with_min_interval(Duration::from_millis(config.geocode.min_interval_ms));
    let geocoder = NominatimGeocoder::new(limiter, config.geocode.qualifier.clone());

    let coords = geocode_unique(&geocoder, records).await;
    info!("Resolved {} unique locations", coords.len());

    let html = render_map(records, &coords);
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, html)?;
    println!("✅ Map saved to {}", output.display());
    Ok(())
}

async fn chat_stage(config: &Config, input: &Path) -> anyhow::Result<()> {
    let records = csv_store::read_enriched(input)?;
    let summary = summarize(&records);

    let api_key = openai_api_key()?;
    let model: Arc<dyn ChatModel> = Arc::new(OpenAiChat::new(
        api_key,
        config.llm.model.clone(),
        config.llm.answer_temperature,
    ));
    let assistant = QaAssistant::new(model);
    assistant.run_loop(&summary).await?;
    Ok(())
}
