//! Obtains a bearer token to pass into launched JVMs, so that tests can
//! talk to a remote ecosystem on the user's behalf.

use async_trait::async_trait;
use tracing::debug;

use crate::bootstrap::{remote_config_store_url, BootstrapProperties};
use crate::env::Environment;
use crate::error::{Error, Result};

/// The environment variable holding a previously-fetched access token.
pub const TOKEN_ENV_VAR: &str = "GALASA_TOKEN";

/// Negotiates a JWT for a remote ecosystem.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Fetch a bearer token, or fail with an authentication error.
    async fn bearer_token(&self) -> Result<String>;
}

/// Reads the access token straight from the process environment.
pub struct EnvTokenAuthenticator {
    env: std::sync::Arc<dyn Environment>,
}

impl EnvTokenAuthenticator {
    /// Create an authenticator backed by the given environment.
    pub fn new(env: std::sync::Arc<dyn Environment>) -> Self {
        Self { env }
    }
}

#[async_trait]
impl Authenticator for EnvTokenAuthenticator {
    async fn bearer_token(&self) -> Result<String> {
        match self.env.get_env(TOKEN_ENV_VAR).filter(|t| !t.is_empty()) {
            Some(token) => Ok(token),
            None => Err(Error::AuthenticationFailed {
                reason: format!("the {} environment variable is not set", TOKEN_ENV_VAR),
            }),
        }
    }
}

/// Work out whether a JWT should be fetched and, if so, fetch it.
///
/// A token is only needed when the bootstrap points at a remote
/// configuration store. A local run against a local store proceeds
/// without one, and a failure to authenticate is reported to the
/// caller rather than silently launching without the token.
pub async fn jwt_for_launch(
    bootstrap_props: &BootstrapProperties,
    authenticator: &dyn Authenticator,
) -> Result<Option<String>> {
    match remote_config_store_url(bootstrap_props) {
        Some(url) => {
            debug!(url, "configuration store is remote, fetching a bearer token");
            Ok(Some(authenticator.bearer_token().await?))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::PROPERTY_CONFIG_STORE;
    use crate::env::MapEnvironment;
    use std::sync::Arc;

    fn remote_props() -> BootstrapProperties {
        let mut props = BootstrapProperties::new();
        props.insert(
            PROPERTY_CONFIG_STORE.to_string(),
            "galasacps://my.ecosystem/api".to_string(),
        );
        props
    }

    #[smol_potat::test]
    async fn local_store_needs_no_jwt() {
        let env = Arc::new(MapEnvironment::new());
        let authenticator = EnvTokenAuthenticator::new(env);
        let props = BootstrapProperties::new();
        assert_eq!(jwt_for_launch(&props, &authenticator).await.unwrap(), None);
    }

    #[smol_potat::test]
    async fn remote_store_fetches_jwt_from_environment() {
        let env = Arc::new(MapEnvironment::new().with(TOKEN_ENV_VAR, "my-token"));
        let authenticator = EnvTokenAuthenticator::new(env);
        let jwt = jwt_for_launch(&remote_props(), &authenticator).await.unwrap();
        assert_eq!(jwt.as_deref(), Some("my-token"));
    }

    #[smol_potat::test]
    async fn remote_store_without_token_fails() {
        let env = Arc::new(MapEnvironment::new());
        let authenticator = EnvTokenAuthenticator::new(env);
        let err = jwt_for_launch(&remote_props(), &authenticator).await.unwrap_err();
        assert!(matches!(err, Error::AuthenticationFailed { .. }));
    }

    #[smol_potat::test]
    async fn empty_token_counts_as_unset() {
        let env = Arc::new(MapEnvironment::new().with(TOKEN_ENV_VAR, ""));
        let authenticator = EnvTokenAuthenticator::new(env);
        assert!(jwt_for_launch(&remote_props(), &authenticator).await.is_err());
    }
}
