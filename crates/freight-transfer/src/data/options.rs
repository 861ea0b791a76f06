use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Username plus password or security token.
///
/// Prefer a token generated for this client over storing a password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret:   String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret:   secret.into(),
        }
    }

    /// Value of the `Authorization` header for basic authentication.
    pub fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.username, self.secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"***")
            .finish()
    }
}

/// Where the server lives and who is talking to it.
///
/// # Examples
///
/// ```
/// use freight_transfer::{ClientConfig, Credentials};
///
/// let config = ClientConfig::new("https://files.example.com/")
///     .credentials(Credentials::new("tester", "token"));
/// assert_eq!(config.root, "https://files.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and authority of the server, without a trailing slash.
    pub root: String,

    pub credentials: Credentials,
}

impl ClientConfig {
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into().trim_end_matches('/').to_string();
        Self {
            root,
            credentials: Credentials::new("", ""),
        }
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Settings for the underlying HTTP client.
///
/// Timeouts are enforced by the transport, not by the transfer engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSetting {
    pub proxies:         Option<Vec<String>>,
    pub connect_timeout: Option<Duration>,
    pub timeout:         Option<Duration>,
}

impl ClientSetting {
    #[must_use]
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxies.get_or_insert_with(Vec::new).push(url.into());
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[cfg(feature = "reqwest")]
    pub fn build(self) -> Result<reqwest::Client, reqwest::Error> {
        use reqwest::{Client, Proxy};

        let mut cb = Client::builder();

        if let Some(proxies) = self.proxies {
            let (secure, insecure): (Vec<String>, Vec<String>) =
                proxies.into_iter().partition(|u| u.starts_with("https://"));

            for u in secure {
                cb = cb.proxy(Proxy::https(u)?);
            }

            for u in insecure {
                cb = cb.proxy(Proxy::http(u)?);
            }
        }

        if let Some(t) = self.connect_timeout {
            cb = cb.connect_timeout(t);
        }
        if let Some(t) = self.timeout {
            cb = cb.timeout(t);
        }

        cb.build()
    }
}
