use examroom_core::wire::{
    AssignRunResponse, AssignmentsPage, Paged, RoomsPage, SchedulesPage, StudentsPage,
};
use examroom_core::Snapshot;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const PER_PAGE: u32 = 100;
/// Stop following `total_pages` after this many requests per collection
const MAX_PAGES: u32 = 1_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Blocking client for the exam room REST backend
pub struct BackendClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Downloads every page of every collection the engine reads.
    pub fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        Ok(Snapshot {
            rooms: self.fetch_all::<RoomsPage>()?,
            students: self.fetch_all::<StudentsPage>()?,
            assignments: self.fetch_all::<AssignmentsPage>()?,
            schedules: self.fetch_all::<SchedulesPage>()?,
            ..Snapshot::default()
        })
    }

    /// Triggers the backend's seat assignment run.
    pub fn run_assignment(&self) -> Result<AssignRunResponse, FetchError> {
        let path = "/assign-students";
        let response = self.authorized(self.http.post(self.url(path))).send()?;
        decode(path, response)
    }

    fn fetch_all<P>(&self) -> Result<Vec<P::Item>, FetchError>
    where
        P: Paged + DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let request = self
                .http
                .get(self.url(P::PATH))
                .query(&[("page", page), ("per_page", PER_PAGE)]);
            let response = self.authorized(request).send()?;
            let body: P = decode(P::PATH, response)?;

            let total_pages = body.total_pages();
            items.extend(body.into_items());

            if page >= total_pages || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn decode<T: DeserializeOwned>(path: &str, response: reqwest::blocking::Response) -> Result<T, FetchError> {
    let status = response.status();
    let text = response.text()?;

    if !status.is_success() {
        return Err(FetchError::Server {
            status: status.as_u16(),
            message: server_message(&text),
        });
    }

    serde_json::from_str(&text).map_err(|source| FetchError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Pulls the human-readable message out of an error body.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_prefers_json_fields() {
        assert_eq!(server_message(r#"{"message": "Token expired"}"#), "Token expired");
        assert_eq!(server_message(r#"{"error": "Forbidden"}"#), "Forbidden");
        assert_eq!(server_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = BackendClient::new("http://localhost:5000/api/", None).unwrap();
        assert_eq!(client.url("/rooms"), "http://localhost:5000/api/rooms");
    }
}
