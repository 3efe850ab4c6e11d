use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::error::{ConfigError, Failure};
use crate::types::HttpMethod;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Single-shot JSON request layer shared by every provider adapter.
///
/// A client starts out unconfigured; every request made before
/// [`RequestClient::configure`] fails with [`Failure::Unconfigured`]
/// without touching the network.
#[derive(Default)]
pub struct RequestClient {
    conn: Option<Connection>,
}

struct Connection {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RequestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(
        &mut self,
        base_url: &str,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<(), ConfigError> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let mut header_map = HeaderMap::new();
        header_map.insert("accept", HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            let invalid = || ConfigError::InvalidHeader {
                name: name.to_string(),
            };
            header_map.insert(
                HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?,
                HeaderValue::from_str(value).map_err(|_| invalid())?,
            );
        }

        self.conn = Some(Connection {
            client: reqwest::Client::builder()
                .default_headers(header_map)
                .timeout(timeout)
                .build()?,
            base_url: base_url.to_string(),
            timeout,
        });
        Ok(())
    }

    /// Performs exactly one call to `base_url + path` and returns the parsed
    /// body. GET sends `params` as the query string, POST as a JSON object.
    pub async fn request(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
        method: HttpMethod,
    ) -> Result<Value, Failure> {
        let conn = self.conn.as_ref().ok_or(Failure::Unconfigured)?;
        let url = format!("{}{}", conn.base_url, path);

        let builder = match method {
            HttpMethod::Get => conn.client.get(url).query(params),
            HttpMethod::Post => conn.client.post(url).json(params),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| conn.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Failure::HttpStatus {
                code: status.as_u16(),
                details: format!("{status} for url ({})", response.url()),
            });
        }

        let body = response.bytes().await.map_err(|e| conn.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| Failure::MalformedResponse(e.to_string()))
    }
}

impl Connection {
    fn classify(&self, e: reqwest::Error) -> Failure {
        if e.is_timeout() {
            Failure::Timeout {
                after: self.timeout,
            }
        } else if e.is_decode() {
            Failure::MalformedResponse(e.to_string())
        } else {
            // refused, reset, DNS and TLS failures all end the request the same way
            Failure::ConnectionFailed(e.to_string())
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    use mockito::Matcher;
    use serde_json::json;

    use crate::api_client::{RequestClient, DEFAULT_TIMEOUT};
    use crate::error::{ConfigError, Failure};
    use crate::types::HttpMethod;

    fn client_for(base_url: &str, timeout: Duration) -> RequestClient {
        let mut client = RequestClient::new();
        client
            .configure(
                base_url,
                &[
                    ("x-rapidapi-host", "f1-motorsport-data.p.rapidapi.com"),
                    ("x-rapidapi-key", "asdf1234"),
                ],
                timeout,
            )
            .unwrap();
        client
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_get_sends_query_and_headers() {
        let mut server = mockito::Server::new_async().await;
        let client = client_for(&server.url(), DEFAULT_TIMEOUT);

        let mock = server
            .mock("GET", "/race-results")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("driverId".into(), "4665".into()),
                Matcher::UrlEncoded("year".into(), "2024".into()),
            ]))
            .match_header("x-rapidapi-host", "f1-motorsport-data.p.rapidapi.com")
            .match_header("x-rapidapi-key", "asdf1234")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"race": "Bahrain Grand Prix", "points": 26}]"#)
            .create_async()
            .await;

        let body = client
            .request(
                "/race-results",
                &params(&[("driverId", "4665"), ("year", "2024")]),
                HttpMethod::Get,
            )
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(body, json!([{"race": "Bahrain Grand Prix", "points": 26}]));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let client = client_for(&format!("{}/", server.url()), DEFAULT_TIMEOUT);

        let mock = server
            .mock("POST", "/race-report")
            .match_body(Matcher::Json(json!({"eventId": "600041134"})))
            .with_status(201)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let body = client
            .request(
                "/race-report",
                &params(&[("eventId", "600041134")]),
                HttpMethod::Post,
            )
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_status_text() {
        let mut server = mockito::Server::new_async().await;
        let client = client_for(&server.url(), DEFAULT_TIMEOUT);

        let _mock = server
            .mock("GET", "/stats")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = client
            .request("/stats", &params(&[("driverId", "1")]), HttpMethod::Get)
            .await
            .unwrap_err();

        match &err {
            Failure::HttpStatus { code, .. } => assert_eq!(*code, 404),
            other => panic!("expected HttpStatus, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Not Found - The requested resource could not be found."
        );
    }

    #[tokio::test]
    async fn test_unmapped_status_reports_code_and_details() {
        let mut server = mockito::Server::new_async().await;
        let client = client_for(&server.url(), DEFAULT_TIMEOUT);

        let _mock = server
            .mock("GET", "/stats")
            .match_query(Matcher::Any)
            .with_status(418)
            .create_async()
            .await;

        let err = client
            .request("/stats", &params(&[("driverId", "1")]), HttpMethod::Get)
            .await
            .unwrap_err();

        assert!(matches!(err, Failure::HttpStatus { code: 418, .. }));
        let message = err.to_string();
        assert!(message.starts_with("HTTP Error 418"));
        assert!(message.contains("Details:"));
        assert!(message.contains("418"));
    }

    #[tokio::test]
    async fn test_unfollowed_redirects_are_status_failures() {
        let mut server = mockito::Server::new_async().await;
        let client = client_for(&server.url(), DEFAULT_TIMEOUT);

        let _moved = server
            .mock("GET", "/race-report")
            .match_query(Matcher::Any)
            .with_status(302)
            .with_body(r#"{"moved": true}"#)
            .create_async()
            .await;
        let _unchanged = server
            .mock("GET", "/stats")
            .match_query(Matcher::Any)
            .with_status(304)
            .create_async()
            .await;

        let err = client
            .request("/race-report", &params(&[("eventId", "1")]), HttpMethod::Get)
            .await
            .unwrap_err();
        assert!(matches!(err, Failure::HttpStatus { code: 302, .. }));
        assert!(err.to_string().starts_with("HTTP Error 302"));

        let err = client
            .request("/stats", &params(&[("driverId", "1")]), HttpMethod::Get)
            .await
            .unwrap_err();
        assert!(matches!(err, Failure::HttpStatus { code: 304, .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let client = client_for(&server.url(), DEFAULT_TIMEOUT);

        let _mock = server
            .mock("GET", "/athlete-info")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>gateway hiccup</html>")
            .create_async()
            .await;

        let err = client
            .request(
                "/athlete-info",
                &params(&[("athleteId", "4665")]),
                HttpMethod::Get,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Failure::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_fails_without_network() {
        let client = RequestClient::new();

        let err = client
            .request("/stats", &BTreeMap::new(), HttpMethod::Get)
            .await
            .unwrap_err();

        assert!(matches!(err, Failure::Unconfigured));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}"), DEFAULT_TIMEOUT);
        let err = client
            .request("/stats", &BTreeMap::new(), HttpMethod::Get)
            .await
            .unwrap_err();

        assert!(matches!(err, Failure::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            // hold the connection open without ever answering
            if let Ok((stream, _)) = listener.accept() {
                thread::sleep(Duration::from_secs(3));
                drop(stream);
            }
        });

        let timeout = Duration::from_millis(200);
        let client = client_for(&format!("http://{addr}"), timeout);
        let err = client
            .request("/stats", &BTreeMap::new(), HttpMethod::Get)
            .await
            .unwrap_err();

        match err {
            Failure::Timeout { after } => assert_eq!(after, timeout),
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_configure_rejects_bad_input() {
        let mut client = RequestClient::new();
        assert!(matches!(
            client.configure("/", &[], DEFAULT_TIMEOUT),
            Err(ConfigError::EmptyBaseUrl)
        ));
        assert!(matches!(
            client.configure("http://localhost", &[("bad header", "x")], DEFAULT_TIMEOUT),
            Err(ConfigError::InvalidHeader { .. })
        ));

        let err = client
            .request("/stats", &BTreeMap::new(), HttpMethod::Get)
            .await
            .unwrap_err();
        assert!(matches!(err, Failure::Unconfigured));
    }
}
