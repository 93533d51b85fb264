use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use loofinder::api::AppState;
use loofinder::assistant::{ChatSession, Classifier, ReplyScheduler};
use loofinder::capabilities::{
    FixedLocationProvider, LocationProvider, SpeechInput, SpeechOutput, StdinSpeechInput,
    TriggerSink, resolve_location,
};
use loofinder::{Location, LooFinderConfig, RestroomDetail, RestroomStore, logging, web};

#[derive(Debug, Parser)]
#[command(
    name = "loofinder",
    version,
    about = "Find nearby restrooms and ask the restroom assistant"
)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask the assistant a single question
    Ask(AskArgs),
    /// Chat with the assistant, one message per line on stdin
    Chat(PositionArgs),
    /// List every known restroom
    List(PositionArgs),
    /// Serve the HTTP API
    Serve(ServeArgs),
}

#[derive(Debug, Args, Clone)]
struct PositionArgs {
    /// Latitude of the current position
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude of the current position
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
}

#[derive(Debug, Args, Clone)]
struct AskArgs {
    #[command(flatten)]
    position: PositionArgs,
    #[arg(value_name = "QUERY")]
    query: Vec<String>,
}

#[derive(Debug, Args, Clone)]
struct ServeArgs {
    #[arg(long)]
    port: Option<u16>,
}

impl PositionArgs {
    fn provider(&self) -> Result<FixedLocationProvider> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Ok(FixedLocationProvider::new(
                Location::try_new(lat, lng).context("Invalid --lat/--lng")?,
            )),
            _ => Ok(FixedLocationProvider::denied()),
        }
    }
}

/// Prints replies as chat bubbles
struct ConsoleSpeechOutput;

#[async_trait]
impl SpeechOutput for ConsoleSpeechOutput {
    async fn speak(&self, text: &str) -> loofinder::Result<()> {
        println!("assistant> {text}");
        Ok(())
    }
}

/// Prints the map filter the view would apply
struct ConsoleTriggerSink;

impl TriggerSink for ConsoleTriggerSink {
    fn on_find_nearby_restrooms(&self, label: &str) {
        println!("[map] showing: {label}");
    }
}

fn load_store(config: &LooFinderConfig) -> Result<RestroomStore> {
    match &config.catalog.path {
        Some(path) => RestroomStore::load(path)
            .with_context(|| format!("Failed to load restroom catalog from {path}")),
        None => RestroomStore::with_builtin_catalog().context("Built-in catalog is invalid"),
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = LooFinderConfig::load_from_path(self.config.clone())?;
        logging::init(&config.logging, self.verbose);
        if self.verbose {
            info!(
                "Using config from: {:?}",
                self.config.clone().or_else(LooFinderConfig::get_config_path)
            );
        }

        let store = load_store(&config)?;
        let classifier = Classifier::new(config.assistant.classifier_settings());

        match self.command {
            Command::Ask(args) => {
                let query = args.query.join(" ");
                let (location, has_location) =
                    resolve_location(&args.position.provider()?).await;
                let result = classifier.classify(&query, has_location, &location, &store.all());
                println!("{}", result.text);
                if let Some(trigger) = result.trigger {
                    ConsoleTriggerSink.on_find_nearby_restrooms(&trigger.label);
                }
                Ok(())
            }
            Command::Chat(position) => {
                let provider = position.provider()?;
                chat(&config, classifier, &store, &provider).await
            }
            Command::List(position) => {
                let viewer = position.provider()?.current_location().await.ok();
                for restroom in store.all() {
                    let detail = RestroomDetail::build(&restroom, viewer.as_ref());
                    let distance = detail.format_distance().unwrap_or_default();
                    println!(
                        "{:<10} {:<36} {} {} {}",
                        detail.id,
                        detail.name,
                        detail.format_cleanliness(),
                        detail.amenities.join(", "),
                        distance
                    );
                }
                Ok(())
            }
            Command::Serve(args) => {
                let mut server = config.server.clone();
                if let Some(port) = args.port {
                    server.port = port;
                }
                web::run(&server, AppState::new(store, classifier)).await
            }
        }
    }
}

async fn chat(
    config: &LooFinderConfig,
    classifier: Classifier,
    store: &RestroomStore,
    provider: &dyn LocationProvider,
) -> Result<()> {
    let mut session = ChatSession::new(
        classifier,
        ReplyScheduler::new(config.assistant.reply_delay()),
        Arc::new(ConsoleSpeechOutput),
        Arc::new(ConsoleTriggerSink),
    );
    session.locate(provider).await;

    if let Some(greeting) = session.transcript().first() {
        println!("assistant> {}", greeting.text);
    }

    let input = StdinSpeechInput::new();
    while let Some(line) = input.listen().await? {
        if line.trim().is_empty() {
            continue;
        }
        session.ask(&line, &store.all());
        session.flush().await;
    }

    session.close();
    Ok(())
}
