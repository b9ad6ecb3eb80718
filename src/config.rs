use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use zeroize::Zeroize;

/// Environment variable names used by earlier deployments of the site.
const LEGACY_PASSWORD_HASH_VAR: &str = "ADMIN_PASSWORD_HASH";
const LEGACY_TOKEN_SECRET_VAR: &str = "JWT_SECRET";

/// Admin gate configuration.
///
/// Both secrets are optional at load time: a missing value does not stop the
/// process from starting, it makes every login and token check fail closed.
#[derive(Deserialize, Clone)]
pub struct AdminConfig {
    /// bcrypt hash of the admin password
    #[serde(default)]
    pub password_hash: Option<String>,
    /// Symmetric key used to sign session tokens
    #[serde(default)]
    pub token_secret: Option<String>,
    /// How long an issued session token stays valid
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Name of the cookie carrying the session token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the session cookie `Secure` (disable only for plain-HTTP dev)
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
    /// Path prefixes that require an admin session
    #[serde(default = "default_protected_prefixes")]
    pub protected_prefixes: Vec<String>,
    /// Exact paths under a protected prefix that stay reachable without a session
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_cookie_name() -> String {
    "admin_token".to_string()
}

fn default_cookie_secure() -> bool {
    true
}

fn default_protected_prefixes() -> Vec<String> {
    vec!["/admin".to_string(), "/api/admin".to_string()]
}

fn default_public_paths() -> Vec<String> {
    vec![
        "/admin/login".to_string(),
        "/api/admin/login".to_string(),
        "/api/admin/logout".to_string(),
        "/api/admin/verify".to_string(),
    ]
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password_hash: None,
            token_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
            cookie_name: default_cookie_name(),
            cookie_secure: default_cookie_secure(),
            protected_prefixes: default_protected_prefixes(),
            public_paths: default_public_paths(),
        }
    }
}

impl AdminConfig {
    /// Treat blank secrets as absent and fill gaps from the legacy variables.
    fn normalize(&mut self) {
        self.normalize_with(|name| std::env::var(name).ok());
    }

    fn normalize_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for slot in [&mut self.password_hash, &mut self.token_secret] {
            if slot.as_deref().is_some_and(|s| s.trim().is_empty()) {
                if let Some(mut blank) = slot.take() {
                    blank.zeroize();
                }
            }
        }

        if self.password_hash.is_none() {
            self.password_hash = lookup(LEGACY_PASSWORD_HASH_VAR).filter(|v| !v.trim().is_empty());
        }
        if self.token_secret.is_none() {
            self.token_secret = lookup(LEGACY_TOKEN_SECRET_VAR).filter(|v| !v.trim().is_empty());
        }
    }
}

impl Drop for AdminConfig {
    fn drop(&mut self) {
        if let Some(ref mut hash) = self.password_hash {
            hash.zeroize();
        }
        if let Some(ref mut secret) = self.token_secret {
            secret.zeroize();
        }
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<redacted>" } else { "<unset>" };
        f.debug_struct("AdminConfig")
            .field("password_hash", &redact(&self.password_hash))
            .field("token_secret", &redact(&self.token_secret))
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("protected_prefixes", &self.protected_prefixes)
            .field("public_paths", &self.public_paths)
            .finish()
    }
}

/// Web server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    3000
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl WebConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Environment source: `WAYMARK_` prefix, `__` between nested keys,
/// e.g. `WAYMARK_ADMIN__PASSWORD_HASH`, `WAYMARK_WEB__PORT`.
fn environment() -> Environment {
    Environment::with_prefix("WAYMARK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Root application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub web: WebConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            // Start with default config file
            .add_source(File::with_name("config/default").required(false))
            // Override with local config if present
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (prefix: WAYMARK_)
            .add_source(environment());

        Self::from_builder(builder)
    }

    /// Build configuration from an already assembled source stack.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut config: Self = builder.build()?.try_deserialize()?;
        config.admin.normalize();
        Ok(config)
    }
}
