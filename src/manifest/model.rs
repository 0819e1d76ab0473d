use serde::{Deserialize, Serialize};

/// Label used when a manifest entry has no display name.
pub const PLACEHOLDER_NAME: &str = "Untitled Card";

/// Normalized representation of one manifest entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSpec {
    /// Identifier, unique within one manifest.
    pub id: String,
    /// Mechanic tag, used to pick the fallback art color.
    pub mechanic_id: String,
    /// Display title.
    pub name: String,
    /// Caption text; may be empty.
    pub flavor_text: String,
    /// Prompt for the image-generation service. `None` means placeholder art.
    pub image_prompt: Option<String>,
    /// Informational copy count. Always at least 1; one image is produced regardless.
    pub count: u32,
}

/// A rendered and uploaded card, handed to the persistence layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCard {
    /// Source manifest entry.
    #[serde(flatten)]
    pub spec: CardSpec,
    /// Public location of the rendered PNG, exactly as returned by storage.
    pub image_url: String,
}

/// Recap of an uploaded manifest, shown before generation starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ManifestSummary {
    /// Deck title declared by the manifest, or a shape-dependent default.
    pub deck_name: String,
    /// Number of entries.
    pub card_count: usize,
}
