//!
//! Blocking HTTP client for the printer status endpoint
//!
use std::{collections::BTreeMap, time::Duration};

use http::Uri;
use log::debug;
use ureq::Agent;

use crate::error::InkError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"), ";ureq");

#[cfg(any(feature = "tls", feature = "native-tls"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TlsBackend {
    #[default]
    Rustls,
    Native,
}

/// Builder to create status client
pub struct StatusClientBuilder {
    uri: Uri,
    ignore_tls_errors: bool,
    request_timeout: Option<Duration>,
    headers: BTreeMap<String, String>,
    #[cfg(any(feature = "tls", feature = "native-tls"))]
    tls_backend: Option<TlsBackend>,
}

impl StatusClientBuilder {
    fn new(uri: Uri) -> Self {
        StatusClientBuilder {
            uri,
            ignore_tls_errors: false,
            request_timeout: None,
            headers: BTreeMap::new(),
            #[cfg(any(feature = "tls", feature = "native-tls"))]
            tls_backend: None,
        }
    }

    /// Enable or disable ignoring of TLS handshake errors. Default is false.
    pub fn ignore_tls_errors(mut self, flag: bool) -> Self {
        self.ignore_tls_errors = flag;
        self
    }

    /// Set network request timeout. Default is no timeout.
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Add a custom HTTP header
    pub fn http_header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.headers.insert(key.as_ref().to_owned(), value.as_ref().to_owned());
        self
    }

    #[cfg(any(feature = "tls", feature = "native-tls"))]
    /// Set TLS backend.
    pub fn tls_backend(mut self, backend: TlsBackend) -> Self {
        self.tls_backend = Some(backend);
        self
    }

    /// Build the client
    pub fn build(self) -> StatusClient {
        StatusClient(self)
    }
}

/// Blocking status client.
///
/// Performs a single unauthenticated GET against the printer status document.
pub struct StatusClient(StatusClientBuilder);

impl StatusClient {
    /// Create status client with default options
    pub fn new(uri: Uri) -> Self {
        StatusClient(StatusClient::builder(uri))
    }

    /// Create status client builder for setting extra options
    pub fn builder(uri: Uri) -> StatusClientBuilder {
        StatusClientBuilder::new(uri)
    }

    /// Return client URI
    pub fn uri(&self) -> &Uri {
        &self.0.uri
    }

    fn agent(&self) -> Agent {
        let mut builder = Agent::config_builder()
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .http_status_as_error(false);

        if let Some(timeout) = self.0.request_timeout {
            builder = builder.timeout_global(Some(timeout));
        }

        #[cfg(any(feature = "tls", feature = "native-tls"))]
        {
            use ureq::tls::{TlsConfig, TlsProvider};

            let mut tls_config = TlsConfig::builder();
            if self.0.ignore_tls_errors {
                tls_config = tls_config.disable_verification(true);
            }

            #[cfg(feature = "tls")]
            if self.0.tls_backend != Some(TlsBackend::Native) {
                tls_config = tls_config.provider(TlsProvider::Rustls);
            }

            #[cfg(feature = "native-tls")]
            if self.0.tls_backend == Some(TlsBackend::Native) || cfg!(not(feature = "tls")) {
                tls_config = tls_config.provider(TlsProvider::NativeTls);
            }

            builder = builder.tls_config(tls_config.build());
        }

        builder.user_agent(USER_AGENT).build().into()
    }

    /// Fetch the status document and return its body text
    pub fn fetch(&self) -> Result<String, InkError> {
        let agent = self.agent();

        debug!("Fetching {}", self.0.uri);

        let mut req = agent.get(&self.0.uri.to_string());

        for (k, v) in &self.0.headers {
            req = req.header(k, v);
        }

        let mut response = req.call()?;

        let status = response.status();
        if !status.is_success() {
            return Err(InkError::RequestError(status.as_u16()));
        }

        let body = response.body_mut().read_to_string()?;
        debug!("Received {} bytes", body.len());

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread::{self, JoinHandle},
    };

    use super::*;

    // Serve a single canned response and hand back the raw request
    fn serve_once(response: String) -> (Uri, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.ends_with(b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        let uri = format!("http://{addr}/DevMgmt/ProductUsageDyn.xml").parse().unwrap();
        (uri, handle)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: text/xml\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn test_fetch_body() {
        let (uri, server) = serve_once(http_response("200 OK", "<root/>"));

        let client = StatusClient::builder(uri)
            .request_timeout(Duration::from_secs(5))
            .http_header("x-test", "1")
            .build();
        let body = client.fetch().unwrap();
        assert_eq!(body, "<root/>");

        let request = server.join().unwrap().to_lowercase();
        assert!(request.starts_with("get /devmgmt/productusagedyn.xml http/1.1"));
        assert!(request.contains("x-test: 1"));
        assert!(request.contains("user-agent: inkmon/"));
    }

    #[test]
    fn test_fetch_http_error() {
        let (uri, server) = serve_once(http_response("404 Not Found", ""));

        let err = StatusClient::new(uri).fetch().unwrap_err();
        assert!(matches!(err, InkError::RequestError(404)));
        server.join().unwrap();
    }

    #[test]
    fn test_fetch_connection_refused() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let uri = format!("http://127.0.0.1:{port}/").parse().unwrap();

        let err = StatusClient::new(uri).fetch().unwrap_err();
        assert!(matches!(err, InkError::ClientError(_)));
    }
}
