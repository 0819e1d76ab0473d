use std::path::{Path, PathBuf};

use crate::foundation::error::{DeckError, DeckResult};

/// Image model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
/// Base URL of the Gemini REST API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// File name of the card frame inside the assets directory.
pub const TEMPLATE_FILE: &str = "card_template.png";
/// File name of the display typeface inside the assets directory.
pub const DISPLAY_FONT_FILE: &str = "BebasNeue-Regular.ttf";
/// Default location of the JSON deck library.
pub const DEFAULT_LIBRARY_PATH: &str = "deckforge-library.json";

/// Locations of the static assets consumed by the compositor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    /// Background frame image.
    pub template: PathBuf,
    /// Typeface used for card titles.
    pub display_font: PathBuf,
    /// Optional typeface for flavor text. Falls back to the display face when absent.
    pub body_font: Option<PathBuf>,
}

impl AssetPaths {
    /// Standard asset layout rooted at `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            template: dir.join(TEMPLATE_FILE),
            display_font: dir.join(DISPLAY_FONT_FILE),
            body_font: None,
        }
    }
}

/// Explicit configuration handed to the deck generator at construction.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Image-generation model identifier.
    pub model: String,
    /// API key for the image-generation service. No key means placeholder art only.
    pub api_key: Option<String>,
    /// Base URL of the image-generation service.
    pub api_base: String,
    /// Static compositor assets.
    pub assets: AssetPaths,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            assets: AssetPaths::in_dir("assets"),
        }
    }
}

/// Where composed cards are uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageConfig {
    /// Write cards below a local directory.
    Local {
        /// Directory receiving `decks/<deck>/<card>.png`.
        root: PathBuf,
        /// URL prefix for returned links. Defaults to `file://<root>`.
        public_base: Option<String>,
    },
    /// Upload cards to an S3-compatible bucket.
    S3 {
        /// Bucket name.
        bucket: String,
        /// Region override. Uses the ambient AWS config when absent.
        region: Option<String>,
        /// Custom endpoint for S3-compatible services.
        endpoint: Option<String>,
        /// URL prefix under which uploaded objects are publicly readable.
        public_base: String,
    },
}

/// Full runtime configuration of the deckforge binary.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Generator settings.
    pub generator: GeneratorConfig,
    /// Upload target.
    pub storage: StorageConfig,
    /// JSON file holding decks and cards.
    pub library_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from process environment variables with defaults.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `GOOGLE_API_KEY`        | unset (placeholder art only)     |
    /// | `GOOGLE_GEN_MODEL`      | `gemini-2.5-flash-image`         |
    /// | `GOOGLE_API_BASE`       | Gemini public endpoint           |
    /// | `DECKFORGE_ASSETS_DIR`  | `assets`                         |
    /// | `DECKFORGE_BODY_FONT`   | unset                            |
    /// | `DECKFORGE_STORAGE`     | `local` (`local` or `s3`)        |
    /// | `DECKFORGE_STORAGE_DIR` | `deckforge-out`                  |
    /// | `DECKFORGE_PUBLIC_BASE` | `file://<storage dir>`           |
    /// | `DECKFORGE_S3_BUCKET`   | required when storage is `s3`    |
    /// | `DECKFORGE_S3_REGION`   | ambient AWS region               |
    /// | `DECKFORGE_S3_ENDPOINT` | AWS default                      |
    /// | `DECKFORGE_LIBRARY`     | `deckforge-library.json`         |
    pub fn from_env() -> DeckResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DeckResult<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let assets_dir = var("DECKFORGE_ASSETS_DIR").unwrap_or_else(|| "assets".into());
        let mut assets = AssetPaths::in_dir(&assets_dir);
        assets.body_font = var("DECKFORGE_BODY_FONT").map(PathBuf::from);

        let generator = GeneratorConfig {
            model: var("GOOGLE_GEN_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            api_key: var("GOOGLE_API_KEY"),
            api_base: var("GOOGLE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
            assets,
        };

        let storage = match var("DECKFORGE_STORAGE").as_deref().unwrap_or("local") {
            "local" => StorageConfig::Local {
                root: PathBuf::from(
                    var("DECKFORGE_STORAGE_DIR").unwrap_or_else(|| "deckforge-out".into()),
                ),
                public_base: var("DECKFORGE_PUBLIC_BASE"),
            },
            "s3" => {
                let bucket = var("DECKFORGE_S3_BUCKET").ok_or_else(|| {
                    DeckError::config("DECKFORGE_S3_BUCKET must be set for s3 storage")
                })?;
                let public_base = var("DECKFORGE_PUBLIC_BASE")
                    .unwrap_or_else(|| format!("https://{bucket}.s3.amazonaws.com"));
                StorageConfig::S3 {
                    bucket,
                    region: var("DECKFORGE_S3_REGION"),
                    endpoint: var("DECKFORGE_S3_ENDPOINT"),
                    public_base,
                }
            }
            other => {
                return Err(DeckError::config(format!(
                    "DECKFORGE_STORAGE must be 'local' or 's3', got '{other}'"
                )));
            }
        };

        let library_path =
            PathBuf::from(var("DECKFORGE_LIBRARY").unwrap_or_else(|| DEFAULT_LIBRARY_PATH.into()));

        Ok(Self {
            generator,
            storage,
            library_path,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
