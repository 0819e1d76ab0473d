use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::Context as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::deck::library::{Deck, DeckStatus, StoredCard};
use crate::foundation::error::{DeckError, DeckResult};
use crate::manifest::model::GeneratedCard;

/// Persistence for decks and their cards.
pub trait DeckRepository: Send + Sync {
    /// Create a deck in the `generating` state.
    fn insert_deck(&self, owner_id: &str, name: &str) -> DeckResult<Deck>;

    /// Move `deck_id` to `status`.
    fn set_status(&self, deck_id: u64, status: DeckStatus) -> DeckResult<()>;

    /// Store one row per generated card, in order.
    fn insert_cards(&self, deck_id: u64, cards: &[GeneratedCard]) -> DeckResult<Vec<StoredCard>>;

    /// Decks owned by `owner_id`, newest first.
    fn list_decks(&self, owner_id: &str) -> DeckResult<Vec<Deck>>;

    /// Look up a deck by id.
    fn get_deck(&self, deck_id: u64) -> DeckResult<Option<Deck>>;

    /// Cards of `deck_id`, in insertion order.
    fn list_cards(&self, deck_id: u64) -> DeckResult<Vec<StoredCard>>;

    /// Remove a deck and its cards. Returns whether the deck existed.
    fn delete_deck(&self, deck_id: u64) -> DeckResult<bool>;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Tables {
    next_deck_id: u64,
    next_card_id: u64,
    decks: Vec<Deck>,
    cards: Vec<StoredCard>,
}

impl Tables {
    fn insert_deck(&mut self, owner_id: &str, name: &str) -> Deck {
        self.next_deck_id += 1;
        let deck = Deck {
            id: self.next_deck_id,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            status: DeckStatus::Generating,
            created_at: Utc::now(),
        };
        self.decks.push(deck.clone());
        deck
    }

    fn set_status(&mut self, deck_id: u64, status: DeckStatus) -> DeckResult<()> {
        let deck = self
            .decks
            .iter_mut()
            .find(|d| d.id == deck_id)
            .ok_or_else(|| DeckError::not_found(format!("deck {deck_id}")))?;
        deck.status = status;
        Ok(())
    }

    fn insert_cards(&mut self, deck_id: u64, cards: &[GeneratedCard]) -> DeckResult<Vec<StoredCard>> {
        if !self.decks.iter().any(|d| d.id == deck_id) {
            return Err(DeckError::not_found(format!("deck {deck_id}")));
        }
        let now = Utc::now();
        let rows: Vec<StoredCard> = cards
            .iter()
            .map(|c| {
                self.next_card_id += 1;
                StoredCard {
                    id: self.next_card_id,
                    deck_id,
                    mechanic_id: c.spec.mechanic_id.clone(),
                    name: c.spec.name.clone(),
                    flavor_text: c.spec.flavor_text.clone(),
                    image_url: Some(c.image_url.clone()),
                    created_at: now,
                }
            })
            .collect();
        self.cards.extend(rows.iter().cloned());
        Ok(rows)
    }

    fn list_decks(&self, owner_id: &str) -> Vec<Deck> {
        let mut decks: Vec<Deck> = self
            .decks
            .iter()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        decks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        decks
    }

    fn get_deck(&self, deck_id: u64) -> Option<Deck> {
        self.decks.iter().find(|d| d.id == deck_id).cloned()
    }

    fn list_cards(&self, deck_id: u64) -> Vec<StoredCard> {
        self.cards
            .iter()
            .filter(|c| c.deck_id == deck_id)
            .cloned()
            .collect()
    }

    fn delete_deck(&mut self, deck_id: u64) -> bool {
        let before = self.decks.len();
        self.decks.retain(|d| d.id != deck_id);
        if self.decks.len() == before {
            return false;
        }
        self.cards.retain(|c| c.deck_id != deck_id);
        true
    }
}

fn lock(tables: &Mutex<Tables>) -> DeckResult<MutexGuard<'_, Tables>> {
    tables
        .lock()
        .map_err(|_| DeckError::Other(anyhow::anyhow!("deck library lock poisoned")))
}

/// In-process repository; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryDeckRepository {
    tables: Mutex<Tables>,
}

impl MemoryDeckRepository {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeckRepository for MemoryDeckRepository {
    fn insert_deck(&self, owner_id: &str, name: &str) -> DeckResult<Deck> {
        Ok(lock(&self.tables)?.insert_deck(owner_id, name))
    }

    fn set_status(&self, deck_id: u64, status: DeckStatus) -> DeckResult<()> {
        lock(&self.tables)?.set_status(deck_id, status)
    }

    fn insert_cards(&self, deck_id: u64, cards: &[GeneratedCard]) -> DeckResult<Vec<StoredCard>> {
        lock(&self.tables)?.insert_cards(deck_id, cards)
    }

    fn list_decks(&self, owner_id: &str) -> DeckResult<Vec<Deck>> {
        Ok(lock(&self.tables)?.list_decks(owner_id))
    }

    fn get_deck(&self, deck_id: u64) -> DeckResult<Option<Deck>> {
        Ok(lock(&self.tables)?.get_deck(deck_id))
    }

    fn list_cards(&self, deck_id: u64) -> DeckResult<Vec<StoredCard>> {
        Ok(lock(&self.tables)?.list_cards(deck_id))
    }

    fn delete_deck(&self, deck_id: u64) -> DeckResult<bool> {
        Ok(lock(&self.tables)?.delete_deck(deck_id))
    }
}

/// Repository persisted as a single JSON document, rewritten after every mutation.
#[derive(Debug)]
pub struct JsonDeckRepository {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl JsonDeckRepository {
    /// Open the library at `path`. A missing file is an empty library.
    pub fn open(path: impl Into<PathBuf>) -> DeckResult<Self> {
        let path = path.into();
        let tables = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("parse deck library '{}'", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::default(),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("read deck library '{}'", path.display()))
                    .into());
            }
        };
        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a copy of the tables; the copy replaces the live tables only once it is
    /// on disk.
    fn mutate<T>(&self, f: impl FnOnce(&mut Tables) -> DeckResult<T>) -> DeckResult<T> {
        let mut tables = lock(&self.tables)?;
        let mut next = tables.clone();
        let out = f(&mut next)?;
        self.flush(&next)?;
        *tables = next;
        Ok(out)
    }

    fn flush(&self, tables: &Tables) -> DeckResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create library dir '{}'", parent.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(tables).context("serialize deck library")?;

        let tmp = self.temp_path();
        std::fs::write(&tmp, bytes)
            .with_context(|| format!("write deck library '{}'", tmp.display()))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(anyhow::Error::new(e)
                .context(format!("replace deck library '{}'", self.path.display()))
                .into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DeckRepository for JsonDeckRepository {
    fn insert_deck(&self, owner_id: &str, name: &str) -> DeckResult<Deck> {
        self.mutate(|t| Ok(t.insert_deck(owner_id, name)))
    }

    fn set_status(&self, deck_id: u64, status: DeckStatus) -> DeckResult<()> {
        self.mutate(|t| t.set_status(deck_id, status))
    }

    fn insert_cards(&self, deck_id: u64, cards: &[GeneratedCard]) -> DeckResult<Vec<StoredCard>> {
        self.mutate(|t| t.insert_cards(deck_id, cards))
    }

    fn list_decks(&self, owner_id: &str) -> DeckResult<Vec<Deck>> {
        Ok(lock(&self.tables)?.list_decks(owner_id))
    }

    fn get_deck(&self, deck_id: u64) -> DeckResult<Option<Deck>> {
        Ok(lock(&self.tables)?.get_deck(deck_id))
    }

    fn list_cards(&self, deck_id: u64) -> DeckResult<Vec<StoredCard>> {
        Ok(lock(&self.tables)?.list_cards(deck_id))
    }

    fn delete_deck(&self, deck_id: u64) -> DeckResult<bool> {
        self.mutate(|t| Ok(t.delete_deck(deck_id)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/repository.rs"]
mod tests;
