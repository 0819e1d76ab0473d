use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::foundation::error::{DeckError, DeckResult};
use crate::manifest::model::{CardSpec, ManifestSummary, PLACEHOLDER_NAME};

/// Style appended to synthesized prompts.
pub const PROMPT_STYLE: &str = "The Oatmeal";

const UNNAMED_LIST: &str = "Unnamed Deck List";
const CUSTOM_DECK: &str = "Custom Deck";

/// An uploaded manifest, resolved to one of the two accepted shapes.
#[derive(Clone, Debug)]
pub enum Manifest {
    /// Top-level array of flat card objects.
    Legacy(Vec<LegacyCard>),
    /// Top-level object with a `cards` array of entries carrying `metadata`.
    Deck(DeckManifest),
}

/// Flat card entry of the legacy array shape.
#[derive(Clone, Debug, Deserialize)]
pub struct LegacyCard {
    #[serde(alias = "card_id")]
    id: String,
    #[serde(alias = "mechanicId")]
    mechanic_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "flavorText")]
    flavor_text: Option<String>,
    #[serde(default, alias = "imagePrompt")]
    image_prompt: Option<String>,
    #[serde(default)]
    count: Option<u32>,
}

/// Object-shaped manifest.
#[derive(Clone, Debug, Deserialize)]
pub struct DeckManifest {
    #[serde(default)]
    deck_name: Option<String>,
    cards: Vec<DeckCard>,
}

/// One entry of an object-shaped manifest.
#[derive(Clone, Debug, Deserialize)]
pub struct DeckCard {
    #[serde(alias = "id")]
    card_id: String,
    mechanic_id: String,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    image_prompt: Option<String>,
    #[serde(default)]
    metadata: CardMetadata,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct CardMetadata {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    flavor_text: Option<String>,
    #[serde(default)]
    image_prompt: Option<String>,
}

impl Manifest {
    /// Decode raw upload bytes and resolve the top-level shape.
    pub fn from_slice(bytes: &[u8]) -> DeckResult<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| DeckError::invalid_manifest(format!("malformed manifest JSON: {e}")))?;

        if value.is_array() {
            let cards: Vec<LegacyCard> = serde_json::from_value(value)
                .map_err(|e| DeckError::invalid_manifest(format!("invalid card entry: {e}")))?;
            return Ok(Self::Legacy(cards));
        }

        if value.get("cards").is_some_and(Value::is_array) {
            let deck: DeckManifest = serde_json::from_value(value)
                .map_err(|e| DeckError::invalid_manifest(format!("invalid card entry: {e}")))?;
            return Ok(Self::Deck(deck));
        }

        Err(unrecognized_shape())
    }

    /// Deck title declared by the manifest, or the shape default.
    pub fn deck_name(&self) -> String {
        match self {
            Self::Legacy(_) => UNNAMED_LIST.to_string(),
            Self::Deck(d) => non_blank(d.deck_name.as_deref())
                .unwrap_or(CUSTOM_DECK)
                .to_string(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Legacy(cards) => cards.len(),
            Self::Deck(d) => d.cards.len(),
        }
    }

    /// Whether the manifest lists no cards.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize every entry into a [`CardSpec`], preserving order.
    pub fn into_card_specs(self) -> DeckResult<Vec<CardSpec>> {
        let specs: Vec<CardSpec> = match self {
            Self::Legacy(cards) => cards.into_iter().map(LegacyCard::into_spec).collect(),
            Self::Deck(d) => d.cards.into_iter().map(DeckCard::into_spec).collect(),
        };

        let mut seen = HashSet::new();
        for (idx, spec) in specs.iter().enumerate() {
            validate_entry(idx, spec)?;
            if !seen.insert(spec.id.as_str()) {
                return Err(DeckError::invalid_manifest(format!(
                    "card {idx}: duplicate id '{}'",
                    spec.id
                )));
            }
        }
        Ok(specs)
    }
}

impl LegacyCard {
    fn into_spec(self) -> CardSpec {
        CardSpec {
            id: self.id,
            mechanic_id: self.mechanic_id,
            name: non_blank(self.name.as_deref())
                .unwrap_or(PLACEHOLDER_NAME)
                .to_string(),
            flavor_text: self.flavor_text.unwrap_or_default(),
            image_prompt: non_blank(self.image_prompt.as_deref()).map(str::to_string),
            count: self.count.unwrap_or(1),
        }
    }
}

impl DeckCard {
    fn into_spec(self) -> CardSpec {
        let name = non_blank(self.metadata.display_name.as_deref())
            .unwrap_or(PLACEHOLDER_NAME)
            .to_string();
        let image_prompt = non_blank(self.image_prompt.as_deref())
            .or_else(|| non_blank(self.metadata.image_prompt.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| synthesize_prompt(&name));

        CardSpec {
            id: self.card_id,
            mechanic_id: self.mechanic_id,
            name,
            flavor_text: self.metadata.flavor_text.unwrap_or_default(),
            image_prompt: Some(image_prompt),
            count: self.count.unwrap_or(1),
        }
    }
}

/// Parse uploaded manifest bytes into card specs.
pub fn parse_manifest(bytes: &[u8]) -> DeckResult<Vec<CardSpec>> {
    Manifest::from_slice(bytes)?.into_card_specs()
}

/// Recap deck name and card count without validating individual entries.
pub fn summarize_manifest(bytes: &[u8]) -> DeckResult<ManifestSummary> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| DeckError::invalid_manifest(format!("malformed manifest JSON: {e}")))?;

    match &value {
        Value::Array(cards) => Ok(ManifestSummary {
            deck_name: UNNAMED_LIST.to_string(),
            card_count: cards.len(),
        }),
        Value::Object(obj) => {
            let Some(Value::Array(cards)) = obj.get("cards") else {
                return Err(unrecognized_shape());
            };
            let deck_name = non_blank(obj.get("deck_name").and_then(Value::as_str))
                .unwrap_or(CUSTOM_DECK)
                .to_string();
            Ok(ManifestSummary {
                deck_name,
                card_count: cards.len(),
            })
        }
        _ => Err(unrecognized_shape()),
    }
}

/// Default prompt for entries that carry none.
pub fn synthesize_prompt(name: &str) -> String {
    format!("{name} in style of {PROMPT_STYLE}")
}

fn validate_entry(idx: usize, spec: &CardSpec) -> DeckResult<()> {
    if spec.id.trim().is_empty() {
        return Err(DeckError::invalid_manifest(format!(
            "card {idx}: id must be non-empty"
        )));
    }
    if spec.mechanic_id.trim().is_empty() {
        return Err(DeckError::invalid_manifest(format!(
            "card {idx}: mechanic_id must be non-empty"
        )));
    }
    if spec.count == 0 {
        return Err(DeckError::invalid_manifest(format!(
            "card {idx}: count must be at least 1"
        )));
    }
    Ok(())
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn unrecognized_shape() -> DeckError {
    DeckError::invalid_manifest(
        "manifest must be an array of cards or an object with a 'cards' array",
    )
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/parse.rs"]
mod tests;
