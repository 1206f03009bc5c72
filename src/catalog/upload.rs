use std::io;
use std::path::Path;

/// A file picked for upload, fully read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(Path::new(&file_name)).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read the file at `path`. The upload name is the path's file name.
    pub async fn read(path: &Path) -> io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_audio(&self) -> bool {
        self.content_type.starts_with("audio/")
    }
}

/// Guess a MIME type from the file extension (case-insensitive).
///
/// Unknown extensions map to `application/octet-stream`; the server decides
/// what it accepts.
pub fn guess_content_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| match ext.to_ascii_lowercase().as_str() {
            "mp3" => "audio/mpeg",
            "flac" => "audio/flac",
            "wav" => "audio/wav",
            "ogg" | "oga" => "audio/ogg",
            "opus" => "audio/opus",
            "m4a" => "audio/mp4",
            "aac" => "audio/aac",
            _ => "application/octet-stream",
        })
        .unwrap_or("application/octet-stream")
}
