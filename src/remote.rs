// HTTP persistence against a quote-base server

use crate::adapter::{Mutation, PersistenceAdapter};
use crate::error::StoreError;
use crate::models::QuoteRecord;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The five-field body of add and edit requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteBody<'a> {
    book_series: &'a str,
    book_title: &'a str,
    characters: &'a str,
    quote: &'a str,
    author: &'a str,
}

impl<'a> From<&'a QuoteRecord> for QuoteBody<'a> {
    fn from(record: &'a QuoteRecord) -> Self {
        Self {
            book_series: &record.book_series,
            book_title: &record.book_title,
            characters: &record.characters,
            quote: &record.quote,
            author: &record.author,
        }
    }
}

/// Successful loads and mutations answer with the full updated collection.
#[derive(Debug, Deserialize)]
struct QuotesEnvelope {
    quotes: Vec<QuoteRecord>,
}

/// Error responses carry a user-facing message.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Persistence backed by the quote-base HTTP API.
///
/// Every mutation maps to one request and the server answers with the
/// authoritative collection, so the store treats this backend exactly like
/// the local one. Requests block the calling flow; there is no retry and no
/// cancellation.
pub struct RemoteAdapter {
    base_url: String,
    client: Client,
}

impl RemoteAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(format!("quotebase/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn collection_from(response: Response) -> Result<Vec<QuoteRecord>, StoreError> {
        let status = response.status();
        let body = response.text()?;
        parse_collection(status, &body)
    }

    /// End the server session. The server answers with a redirect to the
    /// authentication page; the followed final URL is handed back so the
    /// caller can navigate there.
    pub fn logout(&self) -> Result<String, StoreError> {
        let response = self.client.get(self.url("/logout")).send()?;
        if !response.status().is_success() {
            return Err(StoreError::Transport(format!(
                "logout failed with HTTP {}",
                response.status().as_u16()
            )));
        }
        Ok(response.url().to_string())
    }
}

/// Map one response to the canonical collection per the API contract: 2xx
/// carries `{"quotes": [...]}`, 401 means the session is gone, anything else
/// carries `{"error": "..."}`.
fn parse_collection(status: StatusCode, body: &str) -> Result<Vec<QuoteRecord>, StoreError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(StoreError::SessionExpired);
    }

    if status.is_success() {
        let envelope: QuotesEnvelope = serde_json::from_str(body)
            .map_err(|e| StoreError::Transport(format!("unreadable server response: {}", e)))?;
        return Ok(envelope.quotes);
    }

    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
    Err(StoreError::Transport(message))
}

impl PersistenceAdapter for RemoteAdapter {
    fn load(&mut self) -> Result<Vec<QuoteRecord>, StoreError> {
        debug!(url = %self.base_url, "fetching quotes from server");
        let response = self.client.get(self.url("/quotes")).send()?;
        Self::collection_from(response)
    }

    fn save(
        &mut self,
        mutation: Mutation<'_>,
        _all: &[QuoteRecord],
    ) -> Result<Vec<QuoteRecord>, StoreError> {
        let response = match mutation {
            Mutation::Insert(record) => self
                .client
                .post(self.url("/add-quote"))
                .json(&QuoteBody::from(record))
                .send()?,
            Mutation::Replace(record) => self
                .client
                .put(self.url(&format!("/edit-quote/{}", record.id)))
                .json(&QuoteBody::from(record))
                .send()?,
            Mutation::Remove(id) => self
                .client
                .delete(self.url(&format!("/delete-quote/{}", id)))
                .send()?,
        };
        Self::collection_from(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_normalized() {
        let adapter = RemoteAdapter::new("http://localhost:5000/");
        assert_eq!(adapter.url("/add-quote"), "http://localhost:5000/add-quote");
    }

    #[test]
    fn test_success_body_yields_the_collection() {
        let body = r#"{"quotes":[
            {"_id":"65a1","bookSeries":"Dune","bookTitle":"Dune","characters":"Paul","quote":"Fear is the mind-killer","author":"Herbert"}
        ]}"#;
        let quotes = parse_collection(StatusCode::OK, body).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].id, "65a1");
        assert_eq!(quotes[0].book_title, "Dune");
    }

    #[test]
    fn test_401_maps_to_session_expired() {
        let err = parse_collection(StatusCode::UNAUTHORIZED, r#"{"error":"Session expired"}"#)
            .unwrap_err();
        assert!(matches!(err, StoreError::SessionExpired));
    }

    #[test]
    fn test_error_body_message_is_surfaced() {
        let err = parse_collection(StatusCode::BAD_REQUEST, r#"{"error":"This quote already exists!"}"#)
            .unwrap_err();
        match err {
            StoreError::Transport(message) => assert_eq!(message, "This quote already exists!"),
            other => panic!("expected Transport, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_error_body_falls_back_to_status() {
        let err = parse_collection(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").unwrap_err();
        match err {
            StoreError::Transport(message) => assert_eq!(message, "HTTP 500"),
            other => panic!("expected Transport, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_success_body_is_a_transport_error() {
        let err = parse_collection(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[test]
    fn test_request_body_is_camel_case_and_five_fields() {
        let record = QuoteRecord {
            id: "srv-1".to_string(),
            book_series: "Dune".to_string(),
            book_title: "Dune".to_string(),
            characters: "Paul".to_string(),
            quote: "Fear is the mind-killer".to_string(),
            author: "Herbert".to_string(),
            created_at: 1,
            updated_at: 2,
        };
        let json = serde_json::to_value(QuoteBody::from(&record)).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert_eq!(object["bookSeries"], "Dune");
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("createdAt"));
    }
}
