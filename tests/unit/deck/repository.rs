use super::*;
use crate::manifest::model::CardSpec;

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "deckforge_{name}_{}_{}.json",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn generated(id: &str) -> GeneratedCard {
    GeneratedCard {
        spec: CardSpec {
            id: id.into(),
            mechanic_id: "PEEK_3".into(),
            name: format!("Card {id}"),
            flavor_text: "flavor".into(),
            image_prompt: None,
            count: 1,
        },
        image_url: format!("https://cdn.test/{id}.png"),
    }
}

#[test]
fn decks_are_listed_newest_first_per_owner() {
    let repo = MemoryDeckRepository::new();
    let a = repo.insert_deck("alice", "First").unwrap();
    repo.insert_deck("bob", "Other").unwrap();
    let b = repo.insert_deck("alice", "Second").unwrap();

    assert_eq!(a.status, DeckStatus::Generating);
    assert!(b.id > a.id);

    let names: Vec<_> = repo
        .list_decks("alice")
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, ["Second", "First"]);
    assert!(repo.list_decks("carol").unwrap().is_empty());
}

#[test]
fn cards_keep_insertion_order_and_die_with_their_deck() {
    let repo = MemoryDeckRepository::new();
    let deck = repo.insert_deck("alice", "Deck").unwrap();
    let rows = repo
        .insert_cards(deck.id, &[generated("a"), generated("b")])
        .unwrap();
    assert_eq!(rows[0].image_url.as_deref(), Some("https://cdn.test/a.png"));

    let names: Vec<_> = repo
        .list_cards(deck.id)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Card a", "Card b"]);

    assert!(repo.delete_deck(deck.id).unwrap());
    assert!(repo.list_cards(deck.id).unwrap().is_empty());
    assert!(repo.get_deck(deck.id).unwrap().is_none());
    assert!(!repo.delete_deck(deck.id).unwrap());
}

#[test]
fn unknown_deck_status_update_is_not_found() {
    let repo = MemoryDeckRepository::new();
    let err = repo.set_status(99, DeckStatus::Failed).unwrap_err();
    assert!(matches!(err, DeckError::NotFound(_)));
    assert!(matches!(
        repo.insert_cards(99, &[generated("a")]).unwrap_err(),
        DeckError::NotFound(_)
    ));
}

#[test]
fn json_library_survives_reopen() {
    let path = temp_file("library");
    {
        let repo = JsonDeckRepository::open(&path).unwrap();
        assert!(repo.list_decks("alice").unwrap().is_empty());
        let deck = repo.insert_deck("alice", "Kept").unwrap();
        repo.insert_cards(deck.id, &[generated("a")]).unwrap();
        repo.set_status(deck.id, DeckStatus::Completed).unwrap();
    }

    let repo = JsonDeckRepository::open(&path).unwrap();
    let decks = repo.list_decks("alice").unwrap();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0].status, DeckStatus::Completed);
    assert_eq!(repo.list_cards(decks[0].id).unwrap().len(), 1);

    let next = repo.insert_deck("alice", "Next").unwrap();
    assert!(next.id > decks[0].id);

    std::fs::remove_file(&path).ok();
}

#[test]
fn corrupt_library_file_is_an_error() {
    let path = temp_file("corrupt");
    std::fs::write(&path, b"{ nope").unwrap();
    assert!(matches!(
        JsonDeckRepository::open(&path).unwrap_err(),
        DeckError::Other(_)
    ));
    std::fs::remove_file(&path).ok();
}

#[test]
fn status_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&DeckStatus::Generating).unwrap(),
        "\"generating\""
    );
    assert_eq!(DeckStatus::Failed.to_string(), "failed");
}

#[test]
fn failed_write_leaves_library_unchanged() {
    let path = temp_file("unwritable");
    let repo = JsonDeckRepository::open(&path).unwrap();
    let kept = repo.insert_deck("alice", "Kept").unwrap();

    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir_all(&path).unwrap();

    assert!(repo.insert_deck("alice", "Lost").is_err());
    assert!(repo.set_status(kept.id, DeckStatus::Failed).is_err());
    assert!(repo.delete_deck(kept.id).is_err());

    let decks = repo.list_decks("alice").unwrap();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0].name, "Kept");
    assert_eq!(decks[0].status, DeckStatus::Generating);
    assert!(!repo.temp_path().exists());

    std::fs::remove_dir_all(&path).ok();
}

#[test]
fn flush_replaces_file_without_leaving_temp() {
    let path = temp_file("atomic");
    let repo = JsonDeckRepository::open(&path).unwrap();
    repo.insert_deck("alice", "One").unwrap();
    repo.insert_deck("alice", "Two").unwrap();

    assert!(!repo.temp_path().exists());
    let on_disk: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(on_disk["decks"].as_array().unwrap().len(), 2);

    std::fs::remove_file(&path).ok();
}
