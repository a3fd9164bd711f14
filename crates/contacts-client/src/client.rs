//! Contacts registry client implementation.
//!
//! # Rust Learning Note
//!
//! This module demonstrates **HTTP client in Rust** using hyper.
//!
//! ```ignore
//! let resp = client.request(req).await?;
//! let bytes = resp.into_body().collect().await?.to_bytes();
//! let result: GetContactResponse = serde_json::from_slice(&bytes)?;
//! ```
//!
//! ## Key Points
//!
//! 1. **Type Safety**: serde maps JSON onto the same `Contact` the server uses
//! 2. **Async**: Built on tokio
//! 3. **Error Handling**: Result<T> with ? operator
//! 4. **Streaming**: The list body is decoded frame by frame, not buffered whole

use bytes::Bytes;
use contacts_common::{
    Contact, ContactId, Error, ErrorResponse, GetContactResponse, Result, ResultExt,
};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::stream::ContactStreamDecoder;

/// Address of a registry started with default settings.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9027";

/// Contacts registry client.
///
/// # Rust Learning Note
///
/// ## Connection Pooling
///
/// The hyper client is built once and reused for every call. It keeps
/// connections alive between requests, so a burst of upserts does not pay
/// a TCP handshake each.
pub struct ContactsClient {
    /// Base URL of the registry (e.g., "http://localhost:9027").
    base_url: String,

    /// Hyper HTTP client (reusable, pooled connections).
    client: Client<HttpConnector, Full<Bytes>>,
}

impl ContactsClient {
    /// Creates a new contacts client.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self { base_url, client }
    }

    /// Returns the base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Inserts or updates a contact and returns it as stored.
    ///
    /// A contact without an id comes back with the id the registry minted.
    pub async fn upsert_contact(&self, contact: &Contact) -> Result<Contact> {
        debug!("Upserting contact {:?} ({} {})", contact.id, contact.name, contact.surname);

        let body = serde_json::to_vec(contact)
            .map_err(|e| Error::protocol(format!("Failed to serialize contact: {}", e)))?;

        let req = Request::builder()
            .method("POST")
            .uri(self.uri("/api/v1/contacts")?)
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| Error::protocol(format!("Failed to build request: {}", e)))?;

        let resp = self.send(req).await?;

        let status = resp.status();
        if status.is_success() {
            let stored: Contact = parse_json(&read_body(resp).await?)?;
            debug!("Contact stored as {:?}", stored.id);
            return Ok(stored);
        }

        match contact.id {
            Some(id) if status == StatusCode::NOT_FOUND => Err(Error::contact_not_found(id)),
            _ => Err(error_from_response(resp).await),
        }
    }

    /// Fetches a contact by id.
    ///
    /// `Ok(None)` means the registry has no such contact.
    pub async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>> {
        debug!("Fetching contact {}", id);

        self.fetch_contact(id)
            .await
            .context(format!("Failed to fetch contact {}", id))
    }

    /// Fetches every contact.
    ///
    /// Order is whatever the registry streamed; it is not insertion order.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let contacts = self
            .stream_contacts()
            .await
            .context("Failed to list contacts")?;

        debug!("Listed {} contacts", contacts.len());
        Ok(contacts)
    }

    /// Checks that the registry is up.
    pub async fn health(&self) -> Result<()> {
        let resp = self.get("/api/v1/health").await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(resp).await)
        }
    }

    /// Registers the example contact: Paul Appleseed, no company, one email.
    pub async fn register_example_contact(&self) -> Result<Contact> {
        let contact = Contact::new("Paul", "Appleseed").with_email("paul.appleseed@icloud.com");
        self.upsert_contact(&contact).await
    }

    async fn fetch_contact(&self, id: ContactId) -> Result<Option<Contact>> {
        let resp = self.get(&format!("/api/v1/contacts/{}", id)).await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let response: GetContactResponse = parse_json(&read_body(resp).await?)?;
        Ok(response.contact)
    }

    async fn stream_contacts(&self) -> Result<Vec<Contact>> {
        let resp = self.get("/api/v1/contacts").await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let mut body = resp.into_body();
        let mut decoder = ContactStreamDecoder::new();
        let mut contacts = Vec::new();

        while let Some(frame) = body.frame().await {
            let frame = frame
                .map_err(|e| Error::protocol(format!("Failed to read contact stream: {}", e)))?;
            if let Ok(data) = frame.into_data() {
                contacts.extend(decoder.push(&data)?);
            }
        }
        contacts.extend(decoder.finish()?);

        Ok(contacts)
    }

    fn uri(&self, path: &str) -> Result<Uri> {
        format!("{}{}", self.base_url, path)
            .parse()
            .map_err(|e| Error::protocol(format!("Invalid URI: {}", e)))
    }

    async fn get(&self, path: &str) -> Result<Response<Incoming>> {
        let req = Request::builder()
            .method("GET")
            .uri(self.uri(path)?)
            .body(Full::new(Bytes::new()))
            .map_err(|e| Error::protocol(format!("Failed to build request: {}", e)))?;

        self.send(req).await
    }

    async fn send(&self, req: Request<Full<Bytes>>) -> Result<Response<Incoming>> {
        self.client
            .request(req)
            .await
            .map_err(|e| Error::protocol(format!("HTTP request failed: {}", e)))
    }
}

impl Default for ContactsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

async fn read_body(resp: Response<Incoming>) -> Result<Bytes> {
    Ok(resp
        .into_body()
        .collect()
        .await
        .map_err(|e| Error::protocol(format!("Failed to read response: {}", e)))?
        .to_bytes())
}

fn parse_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::protocol(format!("Failed to parse JSON: {}", e)))
}

/// Turns a non-success response into an error, keeping the server's message.
async fn error_from_response(resp: Response<Incoming>) -> Error {
    let status = resp.status();
    let message = match read_body(resp).await {
        Ok(bytes) => serde_json::from_slice::<ErrorResponse>(&bytes)
            .map(|body| body.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => e.to_string(),
    };
    Error::protocol(format!("Registry returned status {}: {}", status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ContactsClient::new("http://localhost:9027/");
        assert_eq!(client.base_url(), "http://localhost:9027");
    }

    #[test]
    fn test_default_client() {
        let client = ContactsClient::default();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_uri_building() {
        let client = ContactsClient::new("http://localhost:9027");
        let uri = client.uri("/api/v1/contacts/7").unwrap();
        assert_eq!(uri.path(), "/api/v1/contacts/7");
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_protocol_error() {
        // Port 1 is reserved and nothing listens on it
        let client = ContactsClient::new("http://127.0.0.1:1");
        match client.health().await {
            Err(Error::Protocol(msg)) => assert!(msg.contains("HTTP request failed")),
            other => panic!("Expected protocol error, got {:?}", other),
        }
    }
}
