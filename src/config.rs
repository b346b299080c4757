//! Connection parameters and the connection-string codec.
//!
//! A [`Configuration`] holds everything needed to reach one REST endpoint of
//! the document store. It can be built from defaults, from environment
//! variables, or from a single connection string of the form
//! `http[s]://[user:pass@]host[:port]/baseUri`.

use std::env;

use crate::error::{Error, Result};

/// Connection parameters for a document store REST endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Server hostname or IP address
    pub host: String,
    /// REST API port; omitted from the connection string when `None`
    pub port: Option<String>,
    /// Management API port (not part of the connection string)
    pub admin_port: Option<String>,
    /// Use `https` instead of `http`
    pub use_tls: bool,
    /// Authentication scheme; only preemptive `basic` is implemented
    pub auth_scheme: String,
    /// Username for HTTP Basic authentication
    pub username: Option<String>,
    /// Password for HTTP Basic authentication
    pub password: Option<String>,
    /// Target database name
    pub database: String,
    /// Name of the default saved search options on the server
    pub search_options: String,
    /// Path prefix for every request; always begins with `/`
    pub base_uri: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: Some("8000".to_string()),
            admin_port: Some("8001".to_string()),
            use_tls: false,
            auth_scheme: "basic".to_string(),
            username: None,
            password: None,
            database: "Documents".to_string(),
            search_options: "default".to_string(),
            base_uri: "/".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl Configuration {
    /// Build a configuration from `DOCSTORE_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("DOCSTORE_HOST").unwrap_or(defaults.host),
            port: env::var("DOCSTORE_PORT").ok().or(defaults.port),
            admin_port: env::var("DOCSTORE_ADMIN_PORT").ok().or(defaults.admin_port),
            use_tls: env::var("DOCSTORE_SSL")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.use_tls),
            auth_scheme: env::var("DOCSTORE_AUTH").unwrap_or(defaults.auth_scheme),
            username: env::var("DOCSTORE_USERNAME").ok(),
            password: env::var("DOCSTORE_PASSWORD").ok(),
            database: env::var("DOCSTORE_DATABASE").unwrap_or(defaults.database),
            search_options: env::var("DOCSTORE_SEARCH_OPTIONS").unwrap_or(defaults.search_options),
            base_uri: env::var("DOCSTORE_BASE_URI").unwrap_or(defaults.base_uri),
            timeout_ms: env::var("DOCSTORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_ms),
        }
    }

    /// Parse a connection string into a fresh configuration.
    ///
    /// Fields the connection string cannot represent (database, admin port,
    /// timeout) keep their default values.
    pub fn from_connection_string(cs: &str) -> Result<Self> {
        let mut config = Self::default();
        config.set_connection_string(cs)?;
        Ok(config)
    }

    /// Serialize this configuration into its connection-string form:
    /// `http[s]://[user:pass@]host[:port]<base_uri>`.
    ///
    /// The credential segment is omitted entirely when no username is set;
    /// the port is omitted when unset. [`set_connection_string`] parses any
    /// string this method produces back into the same fields.
    ///
    /// [`set_connection_string`]: Configuration::set_connection_string
    pub fn connection_string(&self) -> String {
        let mut cs = String::from(if self.use_tls { "https://" } else { "http://" });
        if let Some(user) = &self.username {
            cs.push_str(user);
            cs.push(':');
            cs.push_str(self.password.as_deref().unwrap_or(""));
            cs.push('@');
        }
        cs.push_str(&self.host);
        if let Some(port) = &self.port {
            cs.push(':');
            cs.push_str(port);
        }
        cs.push_str(&self.base_uri);
        cs
    }

    /// Update scheme, credentials, host, port, and base URI from a
    /// connection string. Other fields are left untouched.
    ///
    /// # Errors
    /// [`Error::Format`] when the string does not start with `http://` or
    /// `https://`, or when a credential segment lacks the `:` separator.
    pub fn set_connection_string(&mut self, cs: &str) -> Result<()> {
        let mut rest = if let Some(r) = cs.strip_prefix("https://") {
            self.use_tls = true;
            r
        } else if let Some(r) = cs.strip_prefix("http://") {
            self.use_tls = false;
            r
        } else {
            return Err(Error::Format(format!(
                "connection string must start with http:// or https://: {cs}"
            )));
        };

        // A credential segment is an '@' that precedes the first '/'.
        match rest.find('@') {
            Some(at) if !rest[..at].contains('/') => {
                let userpass = &rest[..at];
                let colon = userpass.find(':').ok_or_else(|| {
                    Error::Format(format!("credentials segment is missing ':': {userpass}"))
                })?;
                self.username = Some(userpass[..colon].to_string());
                self.password = Some(userpass[colon + 1..].to_string());
                rest = &rest[at + 1..];
            }
            _ => {
                self.username = None;
                self.password = None;
            }
        }

        match rest.find(':') {
            Some(colon) => {
                self.host = rest[..colon].to_string();
                let tail = &rest[colon + 1..];
                match tail.find('/') {
                    Some(slash) => {
                        self.port = Some(tail[..slash].to_string());
                        self.base_uri = tail[slash..].to_string();
                    }
                    None => {
                        self.port = Some(tail.to_string());
                        self.base_uri = "/".to_string();
                    }
                }
            }
            None => {
                self.port = None;
                match rest.find('/') {
                    Some(slash) => {
                        self.host = rest[..slash].to_string();
                        self.base_uri = rest[slash..].to_string();
                    }
                    None => {
                        self.host = rest.to_string();
                        self.base_uri = "/".to_string();
                    }
                }
            }
        }

        Ok(())
    }

    /// The `scheme://host[:port]` part the HTTP client actually dials.
    pub fn origin(&self) -> String {
        let mut origin = String::from(if self.use_tls { "https://" } else { "http://" });
        origin.push_str(&self.host);
        if let Some(port) = &self.port {
            origin.push(':');
            origin.push_str(port);
        }
        origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Configuration {
        Configuration {
            host: "db.example.com".to_string(),
            port: Some("8000".to_string()),
            use_tls: true,
            username: Some("u".to_string()),
            password: Some("p".to_string()),
            base_uri: "/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn serializes_full_connection_string() {
        assert_eq!(
            base_config().connection_string(),
            "https://u:p@db.example.com:8000/"
        );
    }

    #[test]
    fn omits_credentials_and_port_when_unset() {
        let config = Configuration {
            host: "db.example.com".to_string(),
            port: None,
            use_tls: false,
            username: None,
            password: None,
            base_uri: "/api".to_string(),
            ..Default::default()
        };
        assert_eq!(config.connection_string(), "http://db.example.com/api");
    }

    #[test]
    fn round_trips_all_field_combinations() {
        for use_tls in [false, true] {
            for creds in [None, Some(("user", "secret"))] {
                for port in [None, Some("9001")] {
                    for base_uri in ["/", "/v1/api"] {
                        let config = Configuration {
                            host: "db.example.com".to_string(),
                            port: port.map(str::to_string),
                            use_tls,
                            username: creds.map(|(u, _)| u.to_string()),
                            password: creds.map(|(_, p)| p.to_string()),
                            base_uri: base_uri.to_string(),
                            ..Default::default()
                        };
                        let parsed =
                            Configuration::from_connection_string(&config.connection_string())
                                .unwrap();
                        assert_eq!(parsed.use_tls, config.use_tls);
                        assert_eq!(parsed.username, config.username);
                        assert_eq!(parsed.password, config.password);
                        assert_eq!(parsed.host, config.host);
                        assert_eq!(parsed.port, config.port);
                        assert_eq!(parsed.base_uri, config.base_uri);
                    }
                }
            }
        }
    }

    #[test]
    fn parse_defaults_base_uri_to_slash() {
        let config = Configuration::from_connection_string("http://db.example.com").unwrap();
        assert_eq!(config.host, "db.example.com");
        assert_eq!(config.port, None);
        assert_eq!(config.base_uri, "/");
        assert!(!config.use_tls);
    }

    #[test]
    fn parse_password_may_contain_colon() {
        let config =
            Configuration::from_connection_string("https://u:pa:ss@h:8000/").unwrap();
        assert_eq!(config.username.as_deref(), Some("u"));
        assert_eq!(config.password.as_deref(), Some("pa:ss"));
        assert_eq!(config.host, "h");
        assert_eq!(config.port.as_deref(), Some("8000"));
    }

    #[test]
    fn parse_rejects_missing_scheme() {
        assert!(matches!(
            Configuration::from_connection_string("db.example.com:8000"),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn parse_rejects_credentials_without_colon() {
        assert!(matches!(
            Configuration::from_connection_string("http://user@h:8000/"),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn parse_at_sign_after_path_is_not_credentials() {
        let config =
            Configuration::from_connection_string("http://h:8000/docs/a@b.json").unwrap();
        assert_eq!(config.username, None);
        assert_eq!(config.host, "h");
        assert_eq!(config.base_uri, "/docs/a@b.json");
    }

    #[test]
    fn origin_drops_credentials_and_base_uri() {
        assert_eq!(base_config().origin(), "https://db.example.com:8000");
    }

    #[test]
    fn set_connection_string_clears_stale_credentials() {
        let mut config = base_config();
        config.set_connection_string("http://other.example.com:7000/").unwrap();
        assert_eq!(config.username, None);
        assert_eq!(config.password, None);
        assert_eq!(config.host, "other.example.com");
    }
}
