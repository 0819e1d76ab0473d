use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage, imageops};

use crate::art::resolver::ArtLayer;
use crate::foundation::error::{DeckError, DeckResult};
use crate::manifest::model::CardSpec;
use crate::render::assets::CardAssets;
use crate::render::overlay::{ART_ORIGIN, CARD_HEIGHT, CARD_WIDTH, overlay_svg};

/// Merges template, art and text into the final card bitmap.
///
/// Layer order is fixed: template, art window, text overlay. Rendering is pure, so the same
/// inputs always produce the same pixels.
#[derive(Clone, Debug)]
pub struct CardCompositor {
    assets: Arc<CardAssets>,
}

impl CardCompositor {
    /// Compositor drawing with `assets`.
    pub fn new(assets: CardAssets) -> Self {
        Self {
            assets: Arc::new(assets),
        }
    }

    /// Loaded static assets.
    pub fn assets(&self) -> &CardAssets {
        &self.assets
    }

    /// Render the `CARD_WIDTH` x `CARD_HEIGHT` card for `spec` with `art`.
    pub fn compose(&self, spec: &CardSpec, art: &ArtLayer) -> DeckResult<RgbaImage> {
        let mut base = self.assets.template().clone();
        imageops::overlay(&mut base, &art.image, ART_ORIGIN.0, ART_ORIGIN.1);

        let svg = overlay_svg(
            spec,
            self.assets.display_family(),
            self.assets.body_family(),
        );
        let opts = self.assets.svg_options();
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| DeckError::render(format!("parse overlay svg: {e}")))?;

        // The overlay is blended by resvg onto the premultiplied base, so an opaque template
        // stays fully opaque.
        let mut rgba = base.into_raw();
        premultiply_rgba8_in_place(&mut rgba);
        let size = resvg::tiny_skia::IntSize::from_wh(CARD_WIDTH, CARD_HEIGHT)
            .ok_or_else(|| DeckError::render("invalid card size"))?;
        let mut pixmap = resvg::tiny_skia::Pixmap::from_vec(rgba, size)
            .ok_or_else(|| DeckError::render("card buffer has unexpected size"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        let mut rgba = pixmap.take();
        demultiply_rgba8_in_place(&mut rgba);
        RgbaImage::from_raw(CARD_WIDTH, CARD_HEIGHT, rgba)
            .ok_or_else(|| DeckError::render("card pixmap has unexpected size"))
    }
}

/// Encode a composed card as PNG bytes.
pub fn encode_png(card: &RgbaImage) -> DeckResult<Vec<u8>> {
    let mut buf = Vec::new();
    card.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| DeckError::render(format!("encode card png: {e}")))?;
    Ok(buf)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
