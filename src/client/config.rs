use std::fmt;
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:8081";

/// Credentials handed to the transport unchanged
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    Basic {
        username: String,
        password: Option<String>,
    },
    Bearer(String),
}

impl Auth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            username: username.into(),
            password: Some(password.into()),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Auth::Basic { username, password } => request.basic_auth(username, password.as_ref()),
            Auth::Bearer(token) => request.bearer_auth(token),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Auth::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Seyren web UI URL, without the `/api` suffix
    pub url: String,
    pub auth: Option<Auth>,
    /// Per-request deadline; the transport default applies when unset
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            auth: None,
            timeout: None,
            user_agent: format!("seyren-client-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Create a config from environment variables
    /// SEYREN_URL=http://seyren.internal:8081
    /// SEYREN_USERNAME=ops / SEYREN_PASSWORD=secret (basic auth)
    /// SEYREN_TOKEN=... (bearer auth, used when no username is set)
    /// SEYREN_TIMEOUT_SECS=30
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("SEYREN_URL").filter(|u| !u.trim().is_empty()) {
            config.url = url.trim().to_string();
        }

        config.auth = match (lookup("SEYREN_USERNAME"), lookup("SEYREN_TOKEN")) {
            (Some(username), _) => Some(Auth::Basic {
                username,
                password: lookup("SEYREN_PASSWORD"),
            }),
            (None, Some(token)) => Some(Auth::Bearer(token)),
            (None, None) => None,
        };

        config.timeout = lookup("SEYREN_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        config
    }
}
