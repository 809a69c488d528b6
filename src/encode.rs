use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Read the whole file at `path` and return it base64-encoded.
pub fn encode(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "encoded image");
    Ok(STANDARD.encode(bytes))
}

/// Wrap an encoded payload in a data URI. The media type is always
/// `image/jpeg`, whatever the source file actually is.
pub fn data_uri(payload: &str) -> String {
    format!("data:image/jpeg;base64,{}", payload)
}
