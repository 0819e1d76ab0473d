use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "deckforge_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(w, h, image::Rgba([200, 10, 10, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn template_is_resized_to_card_dimensions() {
    let assets = CardAssets::from_bytes(&png(30, 42), b"not a font".to_vec(), None).unwrap();
    assert_eq!(assets.template().dimensions(), (CARD_WIDTH, CARD_HEIGHT));
}

#[test]
fn unusable_font_falls_back_to_default_family() {
    let assets = CardAssets::from_bytes(&png(1, 1), Vec::new(), Some(b"junk".to_vec())).unwrap();
    assert_eq!(assets.face_count(), 0);
    assert_eq!(assets.display_family(), DEFAULT_DISPLAY_FAMILY);
    assert_eq!(assets.body_family(), DEFAULT_DISPLAY_FAMILY);
}

#[test]
fn undecodable_template_is_asset_missing() {
    let err = CardAssets::from_bytes(b"nope", Vec::new(), None).unwrap_err();
    assert!(matches!(err, DeckError::AssetMissing(_)));
}

#[test]
fn load_reports_missing_files() {
    let dir = temp_dir("assets_missing");
    std::fs::create_dir_all(&dir).unwrap();
    let paths = AssetPaths::in_dir(&dir);

    let err = CardAssets::load(&paths).unwrap_err();
    let DeckError::AssetMissing(msg) = err else {
        panic!("expected AssetMissing");
    };
    assert!(msg.contains("card template"), "{msg}");

    std::fs::write(&paths.template, png(2, 2)).unwrap();
    let err = CardAssets::load(&paths).unwrap_err();
    assert!(err.to_string().contains("display font"));

    std::fs::write(&paths.display_font, b"font").unwrap();
    CardAssets::load(&paths).unwrap();

    let mut with_body = paths.clone();
    with_body.body_font = Some(dir.join("missing-body.ttf"));
    let err = CardAssets::load(&with_body).unwrap_err();
    assert!(err.to_string().contains("body font"));

    std::fs::remove_dir_all(&dir).ok();
}
