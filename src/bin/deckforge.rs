use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deckforge::{
    AppConfig, AssetPaths, DeckGenerator, DeckService, GeminiImageGenerator, ImageGenerator,
    JsonDeckRepository, connect_object_store, parse_manifest, summarize_manifest,
};

#[derive(Parser, Debug)]
#[command(name = "deckforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the deck name and card count of a manifest.
    Inspect(InspectArgs),
    /// Generate, upload and record a deck.
    Generate(GenerateArgs),
    /// List an owner's decks and the cards of one of them.
    Library(LibraryArgs),
    /// Delete a deck and its images.
    Delete(DeleteArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Manifest JSON.
    #[arg(long)]
    manifest: PathBuf,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Owner identity.
    #[arg(long)]
    owner: String,

    /// Owner display name used in the deck title.
    #[arg(long)]
    owner_name: Option<String>,

    /// Image-generation model override.
    #[arg(long)]
    model: Option<String>,

    /// Directory holding the card template and fonts.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Deck library file.
    #[arg(long)]
    library: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct LibraryArgs {
    /// Owner identity.
    #[arg(long)]
    owner: String,

    /// Deck to show; defaults to the newest.
    #[arg(long)]
    deck: Option<u64>,

    /// Deck library file.
    #[arg(long)]
    library: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DeleteArgs {
    /// Owner identity.
    #[arg(long)]
    owner: String,

    /// Deck to delete.
    #[arg(long)]
    deck: u64,

    /// Deck library file.
    #[arg(long)]
    library: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deckforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Generate(args) => cmd_generate(args).await,
        Command::Library(args) => cmd_library(args).await,
        Command::Delete(args) => cmd_delete(args).await,
    }
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.manifest)
        .with_context(|| format!("read manifest '{}'", args.manifest.display()))?;
    let summary = summarize_manifest(&bytes)?;
    println!("deck: {}", summary.deck_name);
    println!("cards: {}", summary.card_count);
    Ok(())
}

async fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    // A bad manifest is reported before any asset, storage or service setup.
    let manifest = std::fs::read(&args.manifest)
        .with_context(|| format!("read manifest '{}'", args.manifest.display()))?;
    parse_manifest(&manifest)?;

    let mut config = AppConfig::from_env()?;
    if let Some(model) = args.model {
        config.generator.model = model;
    }
    if let Some(dir) = args.assets {
        let body_font = config.generator.assets.body_font.take();
        config.generator.assets = AssetPaths {
            body_font,
            ..AssetPaths::in_dir(dir)
        };
    }
    if let Some(path) = args.library {
        config.library_path = path;
    }

    let image_gen = GeminiImageGenerator::from_config(&config.generator)
        .map(|g| Arc::new(g) as Arc<dyn ImageGenerator>);
    if image_gen.is_none() {
        tracing::warn!("GOOGLE_API_KEY not set, every card gets placeholder art");
    }

    let store = connect_object_store(&config.storage).await?;
    let generator = DeckGenerator::new(&config.generator, image_gen, store.clone())?;
    let repo = Arc::new(JsonDeckRepository::open(&config.library_path)?);
    let service = DeckService::new(repo, store).with_generator(generator);

    let created = service
        .create_deck(&args.owner, args.owner_name.as_deref(), &manifest)
        .await?;

    println!(
        "deck {} '{}': {}",
        created.deck.id, created.deck.name, created.deck.status
    );
    for card in &created.cards {
        println!("{}\t{}", card.name, card.image_url.as_deref().unwrap_or("-"));
    }
    Ok(())
}

async fn open_service(library: Option<PathBuf>) -> anyhow::Result<DeckService> {
    let mut config = AppConfig::from_env()?;
    if let Some(path) = library {
        config.library_path = path;
    }
    let store = connect_object_store(&config.storage).await?;
    let repo = Arc::new(JsonDeckRepository::open(&config.library_path)?);
    Ok(DeckService::new(repo, store))
}

async fn cmd_library(args: LibraryArgs) -> anyhow::Result<()> {
    let service = open_service(args.library).await?;
    let view = service.library(&args.owner, args.deck)?;

    if view.decks.is_empty() {
        println!("no decks");
        return Ok(());
    }
    for deck in &view.decks {
        let marker = if view.selected.as_ref().is_some_and(|s| s.id == deck.id) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {}\t{}\t{}\t{}",
            deck.id,
            deck.name,
            deck.status,
            deck.created_at.to_rfc3339()
        );
    }
    if let Some(selected) = &view.selected {
        println!();
        println!("{} ({} cards)", selected.name, view.cards.len());
        for card in &view.cards {
            println!(
                "  {}\t{}\t{}",
                card.mechanic_id,
                card.name,
                card.image_url.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}

async fn cmd_delete(args: DeleteArgs) -> anyhow::Result<()> {
    let service = open_service(args.library).await?;
    service.delete_deck(&args.owner, args.deck).await?;
    eprintln!("deleted deck {}", args.deck);
    Ok(())
}
