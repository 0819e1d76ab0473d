use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generation state of a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckStatus {
    /// Cards are being rendered and uploaded.
    Generating,
    /// Every card was uploaded and stored.
    Completed,
    /// Generation stopped on an error; the deck holds no cards.
    Failed,
}

impl std::fmt::Display for DeckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        })
    }
}

/// A named collection of cards belonging to one owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Repository-assigned id; also namespaces the uploaded images.
    pub id: u64,
    /// Owner identity.
    pub owner_id: String,
    /// Display name.
    pub name: String,
    /// Current generation state.
    pub status: DeckStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Persisted card row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCard {
    /// Repository-assigned id.
    pub id: u64,
    /// Owning deck.
    pub deck_id: u64,
    /// Mechanic tag of the source entry.
    pub mechanic_id: String,
    /// Display title.
    pub name: String,
    /// Caption text.
    pub flavor_text: String,
    /// Public image location, when one was produced.
    pub image_url: Option<String>,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// One owner's decks plus the cards of the selected deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LibraryView {
    /// Owned decks, newest first.
    pub decks: Vec<Deck>,
    /// Requested deck, or the newest one.
    pub selected: Option<Deck>,
    /// Cards of `selected`, in insertion order.
    pub cards: Vec<StoredCard>,
}
