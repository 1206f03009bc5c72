use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Deserialize;

/// Opaque server-issued track identifier.
///
/// The service uses numeric ids; string ids are accepted so the client does
/// not care how the backend stores them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum TrackId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Number(n) => write!(f, "{n}"),
            TrackId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TrackId {
    fn from(n: i64) -> Self {
        TrackId::Number(n)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        TrackId::Text(s.to_string())
    }
}

/// A track record as returned by `GET /api/tracks`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub name: Option<String>,
    pub title: Option<String>,
    pub file_path: String,
    pub created_at: Option<String>,
    /// Whole-minute length estimate computed by the server at upload time.
    pub length_minutes: Option<u32>,
}

impl Track {
    /// Display label: `title` when present, otherwise `name`, otherwise empty.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

/// A track plus the path the audio can be fetched from.
///
/// Rebuilt from the server listing on every refresh; `url` always starts
/// with `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayableTrack {
    pub track: Track,
    pub url: String,
}

impl PlayableTrack {
    pub fn id(&self) -> &TrackId {
        &self.track.id
    }

    pub fn label(&self) -> &str {
        self.track.label()
    }

    pub fn length_label(&self) -> Option<String> {
        self.track.length_minutes.map(|m| format!("{m} min"))
    }
}

impl From<Track> for PlayableTrack {
    fn from(track: Track) -> Self {
        let url = normalize_url(&track.file_path);
        Self { track, url }
    }
}

/// Ensure a server-relative path has exactly the leading `/` it needs.
///
/// Paths that already start with `/` are returned unchanged.
pub fn normalize_url(file_path: &str) -> String {
    if file_path.starts_with('/') {
        file_path.to_string()
    } else {
        format!("/{file_path}")
    }
}

/// Render a server timestamp for display.
///
/// Offset timestamps are shown in local time, offset-less ones as-is.
/// Missing values render empty and unparseable ones are passed through raw.
pub fn format_created_at(raw: Option<&str>, format: &str) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::new();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(format).to_string();
    }
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return naive.format(format).to_string();
    }
    raw.to_string()
}
