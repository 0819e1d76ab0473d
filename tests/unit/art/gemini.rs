use serde_json::json;

use super::*;

#[test]
fn request_body_matches_generate_content_shape() {
    let body = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part { text: "a cat" }],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE"],
        },
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "contents": [{"parts": [{"text": "a cat"}]}],
            "generationConfig": {"responseModalities": ["IMAGE"]}
        })
    );
}

#[test]
fn first_inline_image_skips_text_parts() {
    let resp: GenerateResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": {"parts": [
                {"text": "here you go"},
                {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
            ]}
        }]
    }))
    .unwrap();
    assert_eq!(first_inline_image(&resp), Some("aGVsbG8="));
}

#[test]
fn empty_responses_have_no_image() {
    let none: GenerateResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(first_inline_image(&none), None);

    let text_only: GenerateResponse = serde_json::from_value(json!({
        "candidates": [{"content": {"parts": [{"text": "refused"}]}}]
    }))
    .unwrap();
    assert_eq!(first_inline_image(&text_only), None);

    let blank: GenerateResponse = serde_json::from_value(json!({
        "candidates": [{"content": {"parts": [{"inlineData": {"data": ""}}]}}]
    }))
    .unwrap();
    assert_eq!(first_inline_image(&blank), None);
}

#[test]
fn endpoint_and_config_wiring() {
    let g = GeminiImageGenerator::new("https://example.test/", "k", "m1");
    assert_eq!(
        g.endpoint(),
        "https://example.test/v1beta/models/m1:generateContent"
    );

    let mut cfg = GeneratorConfig::default();
    assert!(GeminiImageGenerator::from_config(&cfg).is_none());
    cfg.api_key = Some("secret".into());
    let g = GeminiImageGenerator::from_config(&cfg).unwrap();
    assert_eq!(g.model(), crate::foundation::config::DEFAULT_MODEL);
}
