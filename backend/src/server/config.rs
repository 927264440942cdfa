//! Server configuration loaded from the environment.

use std::env;
use std::net::SocketAddr;

use wicket::domain::SigningSecret;

/// Environment variable holding the token signing secret.
pub const TOKEN_SECRET_VAR: &str = "AUTH_TOKEN_SECRET";
/// Environment variable overriding the bind address.
pub const BIND_ADDR_VAR: &str = "AUTH_BIND_ADDR";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Configuration read once before serving traffic.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) secret: SigningSecret,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// A missing or empty signing secret is a fatal startup error, not a
    /// per-request failure.
    pub fn from_env() -> std::io::Result<Self> {
        let secret = env::var(TOKEN_SECRET_VAR).map_err(|_| {
            std::io::Error::other(format!("{TOKEN_SECRET_VAR} must be set before startup"))
        })?;
        let secret = SigningSecret::new(secret.into_bytes())
            .map_err(|err| std::io::Error::other(format!("{TOKEN_SECRET_VAR}: {err}")))?;

        let bind_addr = env::var(BIND_ADDR_VAR)
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|err| std::io::Error::other(format!("{BIND_ADDR_VAR}: {err}")))?;

        Ok(Self { bind_addr, secret })
    }
}
