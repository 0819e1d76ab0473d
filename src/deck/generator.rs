use std::sync::Arc;

use crate::art::resolver::{ArtResolver, ImageGenerator};
use crate::foundation::config::GeneratorConfig;
use crate::foundation::error::{DeckError, DeckResult};
use crate::manifest::model::{CardSpec, GeneratedCard};
use crate::render::assets::CardAssets;
use crate::render::compositor::{CardCompositor, encode_png};
use crate::storage::object::{ObjectStore, PNG_CONTENT_TYPE, card_object_path};

/// Sequential art → compose → upload pipeline over one manifest.
#[derive(Clone)]
pub struct DeckGenerator {
    resolver: ArtResolver,
    compositor: CardCompositor,
    store: Arc<dyn ObjectStore>,
}

impl DeckGenerator {
    /// Load the card assets named by `config` and wire the external services.
    ///
    /// Fails with `AssetMissing` before any card work if the template or font is unreadable.
    pub fn new(
        config: &GeneratorConfig,
        generator: Option<Arc<dyn ImageGenerator>>,
        store: Arc<dyn ObjectStore>,
    ) -> DeckResult<Self> {
        let assets = CardAssets::load(&config.assets)?;
        Ok(Self::from_parts(assets, ArtResolver::new(generator), store))
    }

    /// Assemble from already-loaded parts.
    pub fn from_parts(
        assets: CardAssets,
        resolver: ArtResolver,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            resolver,
            compositor: CardCompositor::new(assets),
            store,
        }
    }

    /// Compositor used for every card.
    pub fn compositor(&self) -> &CardCompositor {
        &self.compositor
    }

    /// Render and upload every card of `specs`, in order.
    ///
    /// Art failures never abort the run. The first upload failure does, and no partial list is
    /// returned.
    #[tracing::instrument(skip(self, specs), fields(cards = specs.len()))]
    pub async fn generate(
        &self,
        deck_id: u64,
        owner_id: &str,
        specs: &[CardSpec],
    ) -> DeckResult<Vec<GeneratedCard>> {
        tracing::info!("generating deck");
        let mut out = Vec::with_capacity(specs.len());

        for spec in specs {
            let art = self.resolver.resolve(spec).await;
            tracing::debug!(card = %spec.id, source = ?art.source, "art resolved");

            let card = self.compositor.compose(spec, &art)?;
            let png = encode_png(&card)?;

            let path = card_object_path(deck_id, &spec.id);
            let image_url = self
                .store
                .put_public(&path, png, PNG_CONTENT_TYPE)
                .await
                .map_err(|e| DeckError::upload(format!("{path}: {e:#}")))?;
            tracing::debug!(card = %spec.id, url = %image_url, "card uploaded");

            out.push(GeneratedCard {
                spec: spec.clone(),
                image_url,
            });
        }

        tracing::info!(generated = out.len(), "deck generated");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/generator.rs"]
mod tests;
