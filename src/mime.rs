use std::path::Path;

/// Picks the `Content-Type` for a served file from its name.
pub trait MimeTypeDetector: Send + Sync {
    fn detect(&self, name: &str) -> String;
}

/// Guesses from the file extension with [`mime_guess`], falling back to
/// [`fallback_mime`] for extensions it does not know.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuessMime;

impl MimeTypeDetector for GuessMime {
    fn detect(&self, name: &str) -> String {
        match mime_guess::from_path(name).first() {
            Some(mime) => mime.to_string(),
            None => fallback_mime(name).to_string(),
        }
    }
}

/// Content type for the common video containers, `application/octet-stream`
/// for anything else.
pub fn fallback_mime(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("mkv") => "video/x-matroska",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}
