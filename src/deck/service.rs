use std::sync::Arc;

use crate::deck::generator::DeckGenerator;
use crate::deck::library::{Deck, DeckStatus, LibraryView, StoredCard};
use crate::deck::repository::DeckRepository;
use crate::foundation::error::{DeckError, DeckResult};
use crate::manifest::parse::parse_manifest;
use crate::storage::object::{ObjectStore, deck_object_prefix};

/// Owner used in deck names when the uploader has no display name.
pub const DEFAULT_OWNER_NAME: &str = "User";

/// Deck name shown for an owner.
pub fn deck_name_for(owner_display_name: Option<&str>) -> String {
    let name = owner_display_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_OWNER_NAME);
    format!("{name}'s Deck")
}

/// Outcome of a successful deck creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedDeck {
    /// Deck row, in its final state.
    pub deck: Deck,
    /// Persisted cards, in manifest order.
    pub cards: Vec<StoredCard>,
}

/// Upload, library and deletion flows over a repository and the generation pipeline.
#[derive(Clone)]
pub struct DeckService {
    repo: Arc<dyn DeckRepository>,
    store: Arc<dyn ObjectStore>,
    generator: Option<DeckGenerator>,
}

impl DeckService {
    /// Service over `repo` and the store holding uploaded cards. Cannot create decks until a
    /// generator is attached.
    pub fn new(repo: Arc<dyn DeckRepository>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            repo,
            store,
            generator: None,
        }
    }

    /// Attach the generation pipeline. It must upload to the store given to [`DeckService::new`].
    pub fn with_generator(mut self, generator: DeckGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Parse `manifest`, generate every card and record the deck.
    ///
    /// An invalid manifest creates nothing. Any later error leaves the deck `failed` with no
    /// cards and is returned.
    pub async fn create_deck(
        &self,
        owner_id: &str,
        owner_display_name: Option<&str>,
        manifest: &[u8],
    ) -> DeckResult<CreatedDeck> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| DeckError::config("deck generation is not configured"))?;
        let specs = parse_manifest(manifest)?;

        let deck = self
            .repo
            .insert_deck(owner_id, &deck_name_for(owner_display_name))?;
        tracing::info!(deck = deck.id, owner = owner_id, cards = specs.len(), "deck created");

        let stored = match generator.generate(deck.id, owner_id, &specs).await {
            Ok(generated) => self.repo.insert_cards(deck.id, &generated),
            Err(e) => Err(e),
        };

        match stored {
            Ok(cards) => {
                self.repo.set_status(deck.id, DeckStatus::Completed)?;
                Ok(CreatedDeck {
                    deck: Deck {
                        status: DeckStatus::Completed,
                        ..deck
                    },
                    cards,
                })
            }
            Err(err) => {
                tracing::error!(deck = deck.id, error = %err, "deck generation failed");
                if let Err(status_err) = self.repo.set_status(deck.id, DeckStatus::Failed) {
                    tracing::warn!(deck = deck.id, error = %status_err, "could not mark deck failed");
                }
                Err(err)
            }
        }
    }

    /// Decks of `owner_id` plus the cards of the requested deck, or of the newest one.
    pub fn library(&self, owner_id: &str, deck_id: Option<u64>) -> DeckResult<LibraryView> {
        let decks = self.repo.list_decks(owner_id)?;
        let selected = match deck_id {
            Some(id) => decks.iter().find(|d| d.id == id).cloned(),
            None => decks.first().cloned(),
        };
        let cards = match &selected {
            Some(deck) => self.repo.list_cards(deck.id)?,
            None => Vec::new(),
        };
        Ok(LibraryView {
            decks,
            selected,
            cards,
        })
    }

    /// Remove an owned deck, its cards and its uploaded images.
    pub async fn delete_deck(&self, owner_id: &str, deck_id: u64) -> DeckResult<()> {
        match self.repo.get_deck(deck_id)? {
            Some(deck) if deck.owner_id == owner_id => {}
            _ => return Err(DeckError::not_found(format!("deck {deck_id}"))),
        }

        self.repo.delete_deck(deck_id)?;
        if let Err(e) = self.store.delete_prefix(&deck_object_prefix(deck_id)).await {
            tracing::warn!(deck = deck_id, error = %e, "deck images were not removed");
        }
        tracing::info!(deck = deck_id, "deck deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/service.rs"]
mod tests;
