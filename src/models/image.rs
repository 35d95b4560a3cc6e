use crate::error::GenerationError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseFormat {
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "b64_json")]
    Base64,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Url => "url",
            ResponseFormat::Base64 => "b64_json",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "url" => Ok(ResponseFormat::Url),
            "b64_json" | "base64" | "b64" => Ok(ResponseFormat::Base64),
            other => Err(GenerationError::ConfigError(format!(
                "Unknown response format '{}'",
                other
            ))),
        }
    }
}

/// Body of `POST /images/generations`. Built once per submit and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub n: u32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub created: Option<u64>,
    pub data: Vec<ImageData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

/// A single generated artifact: either a link to it or its raw bytes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GeneratedImage {
    Remote(String),
    Inline(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl GeneratedImage {
    pub fn url(&self) -> Option<&str> {
        match self {
            GeneratedImage::Remote(url) => Some(url),
            GeneratedImage::Inline(_) => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            GeneratedImage::Remote(_) => None,
            GeneratedImage::Inline(bytes) => Some(bytes),
        }
    }

    /// Sniffed MIME type of inline bytes. Remote images are not fetched.
    pub fn mime_type(&self) -> Option<&'static str> {
        self.bytes()
            .and_then(|bytes| image::guess_format(bytes).ok())
            .map(|format| format.to_mime_type())
    }
}

// Inline payloads can be megabytes; keep Debug output readable.
impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratedImage::Remote(url) => f.debug_tuple("Remote").field(url).finish(),
            GeneratedImage::Inline(bytes) => {
                write!(f, "Inline(<{} bytes>)", bytes.len())
            }
        }
    }
}

mod base64_bytes {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_format_parsing() {
        assert_eq!("url".parse::<ResponseFormat>().unwrap(), ResponseFormat::Url);
        assert_eq!(
            "base64".parse::<ResponseFormat>().unwrap(),
            ResponseFormat::Base64
        );
        assert_eq!(
            "B64_JSON".parse::<ResponseFormat>().unwrap(),
            ResponseFormat::Base64
        );
        assert!("png".parse::<ResponseFormat>().is_err());
    }

    #[test]
    fn test_request_serializes_wire_names() {
        let request = GenerationRequest {
            model: "dall-e-3".into(),
            prompt: "a lighthouse at dusk".into(),
            size: "1024x1024".into(),
            quality: "standard".into(),
            n: 1,
            response_format: ResponseFormat::Base64,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "dall-e-3",
                "prompt": "a lighthouse at dusk",
                "size": "1024x1024",
                "quality": "standard",
                "n": 1,
                "response_format": "b64_json"
            })
        );
    }

    #[test]
    fn test_inline_image_stored_as_base64_text() {
        let image = GeneratedImage::Inline(vec![0x89, b'P', b'N', b'G']);
        let value = serde_json::to_value(&image).unwrap();
        assert_eq!(value, json!({"kind": "inline", "value": "iVBORw=="}));

        let remote = GeneratedImage::Remote("https://x/y.png".into());
        assert_eq!(
            serde_json::to_value(&remote).unwrap(),
            json!({"kind": "remote", "value": "https://x/y.png"})
        );
    }

    #[test]
    fn test_debug_hides_inline_bytes() {
        let image = GeneratedImage::Inline(vec![0u8; 2048]);
        assert_eq!(format!("{:?}", image), "Inline(<2048 bytes>)");
        assert_eq!(image.url(), None);
    }
}
