use std::io::Cursor;
use std::sync::Mutex;

use image::{ImageFormat, RgbaImage};

use super::*;

#[derive(Default)]
struct RecordingStore {
    puts: Mutex<Vec<(String, Vec<u8>, String)>>,
    fail_at: Option<usize>,
}

#[async_trait::async_trait]
impl ObjectStore for RecordingStore {
    async fn put_public(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let mut puts = self.puts.lock().unwrap();
        if self.fail_at == Some(puts.len()) {
            anyhow::bail!("bucket unavailable");
        }
        puts.push((path.to_string(), bytes, content_type.to_string()));
        Ok(format!("https://cdn.test/{path}?v={}", puts.len()))
    }

    async fn delete_prefix(&self, _prefix: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

fn assets() -> CardAssets {
    let img = RgbaImage::from_pixel(10, 14, image::Rgba([20, 20, 20, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    CardAssets::from_bytes(&buf, b"not a font".to_vec(), None).unwrap()
}

fn spec(id: &str) -> CardSpec {
    CardSpec {
        id: id.into(),
        mechanic_id: "SHUFFLE".into(),
        name: format!("Card {id}"),
        flavor_text: String::new(),
        image_prompt: None,
        count: 1,
    }
}

#[tokio::test]
async fn uploads_each_card_in_order_and_keeps_returned_urls() {
    let store = Arc::new(RecordingStore::default());
    let deck = DeckGenerator::from_parts(assets(), ArtResolver::default(), store.clone());

    let out = deck
        .generate(42, "owner-1", &[spec("a"), spec("b")])
        .await
        .unwrap();

    let puts = store.puts.lock().unwrap();
    let paths: Vec<_> = puts.iter().map(|(p, _, _)| p.as_str()).collect();
    assert_eq!(paths, ["decks/42/a.png", "decks/42/b.png"]);
    assert!(puts.iter().all(|(_, b, ct)| b.starts_with(b"\x89PNG") && ct == "image/png"));

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].spec, spec("a"));
    assert_eq!(out[0].image_url, "https://cdn.test/decks/42/a.png?v=1");
    assert_eq!(out[1].image_url, "https://cdn.test/decks/42/b.png?v=2");
}

#[tokio::test]
async fn upload_failure_aborts_without_partial_list() {
    let store = Arc::new(RecordingStore {
        fail_at: Some(1),
        ..Default::default()
    });
    let deck = DeckGenerator::from_parts(assets(), ArtResolver::default(), store.clone());

    let err = deck
        .generate(1, "owner-1", &[spec("a"), spec("b"), spec("c")])
        .await
        .unwrap_err();

    assert!(matches!(err, DeckError::Upload(ref m) if m.contains("decks/1/b.png")));
    assert_eq!(store.puts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_manifest_uploads_nothing() {
    let store = Arc::new(RecordingStore::default());
    let deck = DeckGenerator::from_parts(assets(), ArtResolver::default(), store.clone());
    assert!(deck.generate(1, "o", &[]).await.unwrap().is_empty());
    assert!(store.puts.lock().unwrap().is_empty());
}

#[test]
fn missing_assets_fail_at_construction() {
    let config = GeneratorConfig {
        assets: crate::foundation::config::AssetPaths::in_dir("/definitely/not/here"),
        ..Default::default()
    };
    let store: Arc<dyn ObjectStore> = Arc::new(RecordingStore::default());
    let err = DeckGenerator::new(&config, None, store).err().unwrap();
    assert!(matches!(err, DeckError::AssetMissing(_)));
}
