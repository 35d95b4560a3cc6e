use crate::{
    error::{GenerationError, Result},
    models::{GeneratedImage, ImageData, ImageGenerationResponse, ResponseFormat},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Turns a raw generation-API response body into a [`GeneratedImage`].
///
/// Only the first element of `data` is consumed. The URL or bytes are
/// returned as-is; nothing is resized or re-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl ImageCodec {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, payload: &[u8], format: ResponseFormat) -> Result<GeneratedImage> {
        let response: ImageGenerationResponse = serde_json::from_slice(payload)
            .map_err(|e| GenerationError::DecodeError(format!("Malformed response body: {}", e)))?;

        let item = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::DecodeError("Response contained no images".into()))?;

        if let Some(revised) = &item.revised_prompt {
            log::debug!("Server revised prompt: {}", revised);
        }

        match format {
            ResponseFormat::Url => Self::decode_url(item),
            ResponseFormat::Base64 => Self::decode_inline(item),
        }
    }

    fn decode_url(item: ImageData) -> Result<GeneratedImage> {
        let raw = item
            .url
            .ok_or_else(|| GenerationError::DecodeError("Missing 'url' field".into()))?;
        url::Url::parse(&raw)
            .map_err(|e| GenerationError::DecodeError(format!("Invalid image URL '{}': {}", raw, e)))?;
        Ok(GeneratedImage::Remote(raw))
    }

    fn decode_inline(item: ImageData) -> Result<GeneratedImage> {
        let encoded = item
            .b64_json
            .ok_or_else(|| GenerationError::DecodeError("Missing 'b64_json' field".into()))?;
        decode_base64_image(&encoded).map(GeneratedImage::Inline)
    }
}

/// Decodes base64 text and checks the result carries a known image signature.
/// ASCII whitespace (line wrapping) is ignored.
pub fn decode_base64_image(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| GenerationError::DecodeError(format!("Invalid base64 image data: {}", e)))?;
    if bytes.is_empty() {
        return Err(GenerationError::DecodeError("Image data is empty".into()));
    }
    image::guess_format(&bytes).map_err(|_| {
        GenerationError::DecodeError("Decoded bytes are not a recognizable image".into())
    })?;
    Ok(bytes)
}
