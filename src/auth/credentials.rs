//! OAuth application credentials and grant types.

use secrecy::{ExposeSecret, SecretString};

use crate::client::BasicAuth;
use crate::{Error, Result};

/// Device id Reddit documents for installed apps that do not track devices.
pub const UNTRACKED_DEVICE_ID: &str = "DO_NOT_TRACK_THIS_DEVICE";

/// How the session obtains its access tokens.
#[derive(Clone)]
pub enum Grant {
    /// Script apps: log in as the owning account
    Password {
        /// Account name
        username: String,
        /// Account password
        password: SecretString,
    },
    /// A refresh token from a previous authorization code flow
    RefreshToken(SecretString),
    /// Application-only access for confidential clients
    ClientCredentials,
    /// Application-only access for installed clients
    Installed {
        /// Unique per-device identifier
        device_id: String,
    },
}

impl Grant {
    fn name(&self) -> &'static str {
        match self {
            Grant::Password { .. } => "password",
            Grant::RefreshToken(_) => "refresh_token",
            Grant::ClientCredentials => "client_credentials",
            Grant::Installed { .. } => "installed_client",
        }
    }
}

impl std::fmt::Debug for Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grant::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Grant::RefreshToken(_) => f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish(),
            Grant::ClientCredentials => f.write_str("ClientCredentials"),
            Grant::Installed { device_id } => f
                .debug_struct("Installed")
                .field("device_id", device_id)
                .finish(),
        }
    }
}

/// A registered Reddit application plus the grant it authenticates with.
///
/// # Example
///
/// ```
/// use reddit_rs::auth::Credentials;
///
/// let creds = Credentials::password("client-id", "client-secret", "bot_account", "hunter2");
/// assert_eq!(creds.client_id, "client-id");
/// assert!(!format!("{creds:?}").contains("hunter2"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret; `None` for installed apps
    pub client_secret: Option<SecretString>,
    /// Grant used to obtain tokens
    pub grant: Grant,
}

impl Credentials {
    /// Script app credentials.
    pub fn password(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Some(SecretString::from(client_secret.into())),
            grant: Grant::Password {
                username: username.into(),
                password: SecretString::from(password.into()),
            },
        }
    }

    /// Credentials for a previously authorized refresh token.
    pub fn refresh_token(
        client_id: impl Into<String>,
        client_secret: Option<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.map(SecretString::from),
            grant: Grant::RefreshToken(SecretString::from(refresh_token.into())),
        }
    }

    /// Application-only credentials for a confidential client.
    pub fn client_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Some(SecretString::from(client_secret.into())),
            grant: Grant::ClientCredentials,
        }
    }

    /// Application-only credentials for an installed client.
    pub fn installed(client_id: impl Into<String>, device_id: Option<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            grant: Grant::Installed {
                device_id: device_id.unwrap_or_else(|| UNTRACKED_DEVICE_ID.to_string()),
            },
        }
    }

    /// Load credentials from `REDDIT_*` environment variables.
    ///
    /// `REDDIT_CLIENT_ID` is required. A `REDDIT_REFRESH_TOKEN` selects the
    /// refresh grant, `REDDIT_USERNAME` with `REDDIT_PASSWORD` the password
    /// grant; otherwise a `REDDIT_CLIENT_SECRET` selects client credentials
    /// and its absence an installed client.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = var("REDDIT_CLIENT_ID")
            .ok_or_else(|| Error::Config("REDDIT_CLIENT_ID is not set".to_string()))?;
        let client_secret = var("REDDIT_CLIENT_SECRET");

        if let Some(token) = var("REDDIT_REFRESH_TOKEN") {
            return Ok(Self::refresh_token(client_id, client_secret, token));
        }

        match (var("REDDIT_USERNAME"), var("REDDIT_PASSWORD")) {
            (Some(username), Some(password)) => {
                let secret = client_secret.ok_or_else(|| {
                    Error::Config("REDDIT_CLIENT_SECRET is required for password login".to_string())
                })?;
                Ok(Self::password(client_id, secret, username, password))
            }
            (Some(_), None) | (None, Some(_)) => Err(Error::Config(
                "REDDIT_USERNAME and REDDIT_PASSWORD must be set together".to_string(),
            )),
            (None, None) => Ok(match client_secret {
                Some(secret) => Self::client_credentials(client_id, secret),
                None => Self::installed(client_id, None),
            }),
        }
    }

    /// Basic auth for the token endpoint.
    pub(crate) fn basic_auth(&self) -> BasicAuth {
        BasicAuth {
            username: self.client_id.clone(),
            password: self
                .client_secret
                .clone()
                .unwrap_or_else(|| SecretString::from(String::new())),
        }
    }

    /// Form fields for the initial token request.
    pub(crate) fn grant_form(&self) -> Vec<(String, String)> {
        let mut form = Vec::new();
        match &self.grant {
            Grant::Password { username, password } => {
                form.push(("grant_type".into(), "password".into()));
                form.push(("username".into(), username.clone()));
                form.push(("password".into(), password.expose_secret().to_string()));
            }
            Grant::RefreshToken(token) => {
                form.push(("grant_type".into(), "refresh_token".into()));
                form.push(("refresh_token".into(), token.expose_secret().to_string()));
            }
            Grant::ClientCredentials => {
                form.push(("grant_type".into(), "client_credentials".into()));
            }
            Grant::Installed { device_id } => {
                form.push((
                    "grant_type".into(),
                    "https://oauth.reddit.com/grants/installed_client".into(),
                ));
                form.push(("device_id".into(), device_id.clone()));
            }
        }
        form
    }

    /// Short grant name for logs.
    pub(crate) fn grant_name(&self) -> &'static str {
        self.grant.name()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("grant", &self.grant)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_requires_client_id() {
        let err = Credentials::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_selects_refresh_token_first() {
        let creds = Credentials::from_lookup(lookup(&[
            ("REDDIT_CLIENT_ID", "id"),
            ("REDDIT_CLIENT_SECRET", "secret"),
            ("REDDIT_USERNAME", "bot"),
            ("REDDIT_PASSWORD", "pw"),
            ("REDDIT_REFRESH_TOKEN", "rt"),
        ]))
        .unwrap();
        assert!(matches!(creds.grant, Grant::RefreshToken(_)));
    }

    #[test]
    fn test_env_password_grant() {
        let creds = Credentials::from_lookup(lookup(&[
            ("REDDIT_CLIENT_ID", "id"),
            ("REDDIT_CLIENT_SECRET", "secret"),
            ("REDDIT_USERNAME", "bot"),
            ("REDDIT_PASSWORD", "pw"),
        ]))
        .unwrap();
        let form = creds.grant_form();
        assert!(form.contains(&("grant_type".to_string(), "password".to_string())));
        assert!(form.contains(&("username".to_string(), "bot".to_string())));
    }

    #[test]
    fn test_env_partial_login_is_rejected() {
        let err = Credentials::from_lookup(lookup(&[
            ("REDDIT_CLIENT_ID", "id"),
            ("REDDIT_USERNAME", "bot"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_application_only() {
        let creds = Credentials::from_lookup(lookup(&[
            ("REDDIT_CLIENT_ID", "id"),
            ("REDDIT_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();
        assert!(matches!(creds.grant, Grant::ClientCredentials));

        let creds = Credentials::from_lookup(lookup(&[("REDDIT_CLIENT_ID", "id")])).unwrap();
        match creds.grant {
            Grant::Installed { device_id } => assert_eq!(device_id, UNTRACKED_DEVICE_ID),
            other => panic!("expected installed grant, got {other:?}"),
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::password("id", "s3cret", "bot", "pa55");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("pa55"));
        assert!(debug.contains("bot"));
    }
}
