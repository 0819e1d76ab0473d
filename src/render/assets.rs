use std::path::Path;
use std::sync::Arc;

use image::{RgbaImage, imageops::FilterType};

use crate::foundation::config::AssetPaths;
use crate::foundation::error::{DeckError, DeckResult};
use crate::render::overlay::{CARD_HEIGHT, CARD_WIDTH};

/// Family requested for titles when the display font reports no name.
pub const DEFAULT_DISPLAY_FAMILY: &str = "Bebas Neue";

/// Static compositor inputs, loaded once per generator.
///
/// The font database only holds the packaged faces, so overlay text never depends on
/// system-installed fonts.
#[derive(Clone)]
pub struct CardAssets {
    template: RgbaImage,
    fontdb: Arc<usvg::fontdb::Database>,
    display_family: String,
    body_family: String,
}

impl CardAssets {
    /// Read and prepare the template and fonts named by `paths`.
    pub fn load(paths: &AssetPaths) -> DeckResult<Self> {
        let template = read_asset(&paths.template, "card template")?;
        let display_font = read_asset(&paths.display_font, "display font")?;
        let body_font = paths
            .body_font
            .as_deref()
            .map(|p| read_asset(p, "body font"))
            .transpose()?;

        Self::from_bytes(&template, display_font, body_font)
    }

    /// Prepare assets from in-memory template and font bytes.
    pub fn from_bytes(
        template_bytes: &[u8],
        display_font: Vec<u8>,
        body_font: Option<Vec<u8>>,
    ) -> DeckResult<Self> {
        let template = image::load_from_memory(template_bytes)
            .map_err(|e| DeckError::asset_missing(format!("decode card template: {e}")))?
            .resize_exact(CARD_WIDTH, CARD_HEIGHT, FilterType::Lanczos3)
            .to_rgba8();

        let mut db = usvg::fontdb::Database::new();
        let display_family = register_font(&mut db, display_font, "display")
            .unwrap_or_else(|| DEFAULT_DISPLAY_FAMILY.to_string());
        let body_family = body_font
            .and_then(|bytes| register_font(&mut db, bytes, "body"))
            .unwrap_or_else(|| display_family.clone());

        Ok(Self {
            template,
            fontdb: Arc::new(db),
            display_family,
            body_family,
        })
    }

    /// Template resized to the card dimensions.
    pub fn template(&self) -> &RgbaImage {
        &self.template
    }

    /// Family name used for card titles.
    pub fn display_family(&self) -> &str {
        &self.display_family
    }

    /// Family name used for flavor text.
    pub fn body_family(&self) -> &str {
        &self.body_family
    }

    /// Number of font faces available to the overlay.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    pub(crate) fn svg_options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: packaged_font_resolver(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for CardAssets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardAssets")
            .field("template", &self.template.dimensions())
            .field("face_count", &self.fontdb.len())
            .field("display_family", &self.display_family)
            .field("body_family", &self.body_family)
            .finish()
    }
}

fn read_asset(path: &Path, what: &str) -> DeckResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| DeckError::asset_missing(format!("read {what} '{}': {e}", path.display())))
}

fn register_font(db: &mut usvg::fontdb::Database, bytes: Vec<u8>, role: &str) -> Option<String> {
    let ids = db.load_font_source(usvg::fontdb::Source::Binary(Arc::new(bytes)));
    let family = ids
        .iter()
        .find_map(|id| db.face(*id)?.families.first().map(|(name, _)| name.clone()));
    if family.is_none() {
        tracing::warn!(role, "font file has no usable faces; text falls back to defaults");
    }
    family
}

fn packaged_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            // Fall back to any packaged face rather than dropping the text.
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/assets.rs"]
mod tests;
