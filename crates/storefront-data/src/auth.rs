//! Client for the storefront auth endpoints.

use crate::client::{unwrap_data, FetchClient};
use crate::FetchError;
use serde_json::Value;
use storefront_auth::{AuthResponse, Credentials, RegisterRequest, User};

/// `POST {base}/auth/login`, `POST {base}/auth/register`,
/// `POST {base}/auth/logout` and `GET {base}/auth/me`.
///
/// Answers may come wrapped in a `{data, meta}` envelope or bare.
pub struct AuthClient {
    client: FetchClient,
}

impl AuthClient {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, FetchError> {
        let payload: Value = self.client.post_json("/auth/login", credentials, None).await?;
        Ok(serde_json::from_value(unwrap_data(payload))?)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, FetchError> {
        let payload: Value = self.client.post_json("/auth/register", request, None).await?;
        Ok(serde_json::from_value(unwrap_data(payload))?)
    }

    /// Revoke `token` on the server.
    pub async fn logout(&self, token: &str) -> Result<(), FetchError> {
        let _: Value = self
            .client
            .post_json("/auth/logout", &Value::Null, Some(token))
            .await?;
        Ok(())
    }

    /// The profile `token` belongs to.
    pub async fn me(&self, token: &str) -> Result<User, FetchError> {
        let payload: Value = self.client.get_json("/auth/me", &[], Some(token)).await?;
        let mut data = unwrap_data(payload);
        if let Some(user) = data.get_mut("user") {
            data = user.take();
        }
        Ok(serde_json::from_value(data)?)
    }
}
