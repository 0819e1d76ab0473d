//! deckforge turns a JSON card manifest into a deck of finished card images.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: manifest bytes -> `Vec<CardSpec>` (two accepted shapes, normalized once)
//! 2. **Art**: `CardSpec -> ArtLayer` (generated image, or a solid square in the mechanic color)
//! 3. **Compose**: template + art + SVG text overlay -> 750x1050 RGBA card
//! 4. **Upload**: PNG bytes -> public URL at `decks/<deck_id>/<card_id>.png`
//!
//! Cards are processed strictly one after another. Art generation failures never abort a
//! deck; storage failures always do.
//!
//! [`DeckService`] wraps the pipeline with deck bookkeeping (status transitions, the per-owner
//! library, deletion) over a [`DeckRepository`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod art;
mod deck;
mod foundation;
mod manifest;
mod render;
mod storage;

pub use art::gemini::GeminiImageGenerator;
pub use art::palette::{DEFAULT_MECHANIC_COLOR, Rgb, mechanic_color};
pub use art::resolver::{
    ART_SIZE, ArtError, ArtLayer, ArtResolver, ArtSource, ImageGenerator, STYLE_MODIFIER,
    normalize_art, styled_prompt,
};
pub use deck::generator::DeckGenerator;
pub use deck::library::{Deck, DeckStatus, LibraryView, StoredCard};
pub use deck::repository::{DeckRepository, JsonDeckRepository, MemoryDeckRepository};
pub use deck::service::{CreatedDeck, DEFAULT_OWNER_NAME, DeckService, deck_name_for};
pub use foundation::config::{
    AppConfig, AssetPaths, DEFAULT_API_BASE, DEFAULT_LIBRARY_PATH, DEFAULT_MODEL,
    DISPLAY_FONT_FILE, GeneratorConfig, StorageConfig, TEMPLATE_FILE,
};
pub use foundation::error::{DeckError, DeckResult};
pub use manifest::model::{CardSpec, GeneratedCard, ManifestSummary, PLACEHOLDER_NAME};
pub use manifest::parse::{
    DeckCard, DeckManifest, LegacyCard, Manifest, PROMPT_STYLE, parse_manifest,
    summarize_manifest, synthesize_prompt,
};
pub use render::assets::{CardAssets, DEFAULT_DISPLAY_FAMILY};
pub use render::compositor::{CardCompositor, encode_png};
pub use render::overlay::{ART_ORIGIN, CARD_HEIGHT, CARD_WIDTH, overlay_svg, wrap_flavor};
pub use storage::local::LocalObjectStore;
pub use storage::object::{
    ObjectStore, PNG_CONTENT_TYPE, card_object_path, connect_object_store, deck_object_prefix,
    normalize_object_key,
};
pub use storage::s3::S3ObjectStore;
