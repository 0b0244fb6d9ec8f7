//! HTTP category source backed by the storefront REST API.
//!
//! # Invariants
//! - One blocking `GET` per fetch; no retries.
//! - Non-2xx responses surface as `SourceError::Status`.

use super::{decode_categories, CategorySource, SourceError};
use crate::config::CatalogConfig;
use crate::model::category::Category;
use log::{error, info};
use reqwest::blocking::Client;
use std::time::Instant;

/// Fetches the flat category list from `{base_url}/{categories_path}`.
#[derive(Debug, Clone)]
pub struct HttpCategorySource {
    client: Client,
    url: String,
}

impl HttpCategorySource {
    /// Builds a source for the configured backend.
    pub fn new(config: &CatalogConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Builds a source reusing an existing client.
    pub fn with_client(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            url: config.categories_url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CategorySource for HttpCategorySource {
    fn fetch_all(&self) -> Result<Vec<Category>, SourceError> {
        let started_at = Instant::now();
        info!("event=category_fetch module=source status=start mode=http");

        let result = self.request();
        match &result {
            Ok(categories) => info!(
                "event=category_fetch module=source status=ok mode=http duration_ms={} count={}",
                started_at.elapsed().as_millis(),
                categories.len()
            ),
            Err(err) => error!(
                "event=category_fetch module=source status=error mode=http duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl HttpCategorySource {
    fn request(&self) -> Result<Vec<Category>, SourceError> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let body = response.text()?;
        decode_categories(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::HttpCategorySource;
    use crate::config::CatalogConfig;
    use crate::model::category::Category;
    use crate::source::{CategorySource, SourceError};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answers exactly one request with `status_line` and `body`, then
    /// returns the raw request it received.
    fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buffer = [0_u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = stream.read(&mut buffer).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (base_url, handle)
    }

    fn source_for(base_url: &str) -> HttpCategorySource {
        HttpCategorySource::new(&CatalogConfig::new(base_url, "categories/flat").unwrap()).unwrap()
    }

    #[test]
    fn success_response_is_decoded_in_backend_order() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"id":2,"parentId":null,"title":"Men"},{"id":7,"parentId":2,"title":"Shirts"}]"#,
        );

        let categories = source_for(&base_url).fetch_all().unwrap();

        assert_eq!(
            categories,
            vec![Category::root(2, "Men"), Category::child(7, 2, "Shirts")]
        );
        let request = server.join().unwrap();
        assert!(request.starts_with("GET /categories/flat "), "{request}");
    }

    #[test]
    fn non_success_status_is_reported_with_code() {
        let (base_url, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
        let source = source_for(&base_url);

        let err = source.fetch_all().unwrap_err();

        match err {
            SourceError::Status { url, status } => {
                assert_eq!(status, 500);
                assert_eq!(url, source.url());
            }
            other => panic!("unexpected error: {other}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn unreachable_backend_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = source_for(&base_url).fetch_all().unwrap_err();

        assert!(matches!(err, SourceError::Http(_)), "{err}");
    }
}
