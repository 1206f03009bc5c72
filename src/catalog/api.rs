use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::error::ApiError;
use super::model::{Track, TrackId, normalize_url};
use super::upload::UploadFile;

const TRACKS_PATH: &str = "/api/tracks";

/// The three operations the track service exposes.
///
/// Futures produced by implementations are polled on a single thread, so
/// they are not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait TrackApi {
    /// `GET /api/tracks`
    async fn list_tracks(&self) -> Result<Vec<Track>, ApiError>;
    /// `POST /api/tracks` with multipart field `file`. The response body is ignored.
    async fn upload_track(&self, file: &UploadFile) -> Result<(), ApiError>;
    /// `DELETE /api/tracks/{id}`. The response body is ignored.
    async fn delete_track(&self, id: &TrackId) -> Result<(), ApiError>;
}

/// `TrackApi` over HTTP.
///
/// The client is built without a request timeout: a hung request stays
/// pending until the server or the connection gives up.
pub struct HttpTrackApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTrackApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl TrackApi for HttpTrackApi {
    async fn list_tracks(&self) -> Result<Vec<Track>, ApiError> {
        let url = resolve_url(&self.base_url, TRACKS_PATH);
        let resp = ensure_success(self.client.get(&url).send().await?)?;
        let body = resp.bytes().await?;
        let tracks = parse_track_listing(&body)?;
        debug!(count = tracks.len(), "fetched track listing");
        Ok(tracks)
    }

    async fn upload_track(&self, file: &UploadFile) -> Result<(), ApiError> {
        let url = resolve_url(&self.base_url, TRACKS_PATH);
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("file", part);

        ensure_success(self.client.post(&url).multipart(form).send().await?)?;
        debug!(file = %file.file_name, bytes = file.bytes.len(), "uploaded track");
        Ok(())
    }

    async fn delete_track(&self, id: &TrackId) -> Result<(), ApiError> {
        let url = resolve_url(&self.base_url, &format!("{TRACKS_PATH}/{id}"));
        ensure_success(self.client.delete(&url).send().await?)?;
        debug!(%id, "deleted track");
        Ok(())
    }
}

fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ApiError::Status(status.as_u16()))
    }
}

/// Decode a `GET /api/tracks` body.
pub fn parse_track_listing(body: &[u8]) -> Result<Vec<Track>, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::Decode)
}

/// Join the service base URL with a server-relative path.
pub fn resolve_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), normalize_url(path))
}
