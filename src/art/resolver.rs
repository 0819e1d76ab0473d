use std::sync::Arc;

use image::{RgbaImage, imageops::FilterType};

use crate::art::palette::mechanic_color;
use crate::manifest::model::CardSpec;

/// Edge length of the square art layer.
pub const ART_SIZE: u32 = 500;

/// Appended to every prompt sent to the image service.
pub const STYLE_MODIFIER: &str = "Style of The Oatmeal, crude vector illustration, thick messy black outlines, flat colors, white background, minimalist, high contrast, corporate satire theme";

/// Failure while obtaining generated art. Never leaves the resolver.
#[derive(thiserror::Error, Debug)]
pub enum ArtError {
    /// Transport or HTTP-level failure talking to the service.
    #[error("image service request failed: {0}")]
    Request(String),

    /// The response carried no image payload.
    #[error("image service returned no image")]
    EmptyResponse,

    /// The payload was not valid base64 or not a decodable image.
    #[error("image payload could not be decoded: {0}")]
    Decode(String),
}

/// External text-to-image service.
#[async_trait::async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Produce encoded image bytes for `prompt`.
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ArtError>;
}

/// Where an art layer came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtSource {
    /// Returned by the image service.
    Generated,
    /// Solid mechanic color.
    Fallback,
}

/// Square RGBA artwork ready for compositing.
#[derive(Clone, Debug)]
pub struct ArtLayer {
    /// `ART_SIZE` x `ART_SIZE` pixels.
    pub image: RgbaImage,
    /// Origin of the pixels.
    pub source: ArtSource,
}

/// Obtains per-card artwork, downgrading every generation failure to a placeholder.
#[derive(Clone, Default)]
pub struct ArtResolver {
    generator: Option<Arc<dyn ImageGenerator>>,
}

impl ArtResolver {
    /// Resolver backed by `generator`. `None` always yields placeholder art.
    pub fn new(generator: Option<Arc<dyn ImageGenerator>>) -> Self {
        Self { generator }
    }

    /// Art for `spec`. Always succeeds.
    pub async fn resolve(&self, spec: &CardSpec) -> ArtLayer {
        let (Some(prompt), Some(generator)) = (spec.image_prompt.as_deref(), &self.generator)
        else {
            return Self::fallback(spec);
        };

        match Self::generate(generator.as_ref(), prompt).await {
            Ok(image) => ArtLayer {
                image,
                source: ArtSource::Generated,
            },
            Err(err) => {
                tracing::warn!(card = %spec.id, error = %err, "art generation failed, using placeholder");
                Self::fallback(spec)
            }
        }
    }

    /// Solid square in the mechanic's color.
    pub fn fallback(spec: &CardSpec) -> ArtLayer {
        let px = image::Rgba(mechanic_color(&spec.mechanic_id).to_rgba8());
        ArtLayer {
            image: RgbaImage::from_pixel(ART_SIZE, ART_SIZE, px),
            source: ArtSource::Fallback,
        }
    }

    async fn generate(generator: &dyn ImageGenerator, prompt: &str) -> Result<RgbaImage, ArtError> {
        let bytes = generator.generate_image(&styled_prompt(prompt)).await?;
        normalize_art(&bytes)
    }
}

/// Prompt with the enforced illustration style appended.
pub fn styled_prompt(prompt: &str) -> String {
    format!("{prompt}. {STYLE_MODIFIER}")
}

/// Decode service output and center-crop it to the art square.
pub fn normalize_art(bytes: &[u8]) -> Result<RgbaImage, ArtError> {
    if bytes.is_empty() {
        return Err(ArtError::EmptyResponse);
    }
    let img = image::load_from_memory(bytes).map_err(|e| ArtError::Decode(e.to_string()))?;
    Ok(img
        .resize_to_fill(ART_SIZE, ART_SIZE, FilterType::Lanczos3)
        .to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/art/resolver.rs"]
mod tests;
