//! Hosted identity provider (GoTrue REST API): sign-up, password sign-in,
//! password-reset mail and service-role user deletion.

use crate::config::IdentitySettings;
use crate::error::IdentityError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct IdentityUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub user: IdentityUser,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityUser, IdentityError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;
    async fn request_password_reset(&self, email: &str) -> Result<(), IdentityError>;
    /// Service-role only.
    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError>;
}

/// One reqwest client holding both keys; built once at startup.
#[derive(Clone)]
pub struct GoTrueClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl GoTrueClient {
    pub fn new(settings: &IdentitySettings) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()?;
        Ok(GoTrueClient {
            http,
            base_url: format!("{}/auth/v1", settings.base_url.trim_end_matches('/')),
            anon_key: settings.anon_key.clone(),
            service_role_key: settings.service_role_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, IdentityError> {
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        if status.is_success() {
            return Ok(body);
        }
        Err(classify_error(status, &body))
    }
}

/// Map a GoTrue error response to an [`IdentityError`] by status and error code.
fn classify_error(status: StatusCode, body: &Value) -> IdentityError {
    let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_string);
    let code = field("error_code").or_else(|| field("error")).unwrap_or_default();
    let message = field("msg")
        .or_else(|| field("error_description"))
        .or_else(|| field("message"))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    match (status, code.as_str()) {
        (_, "invalid_credentials") | (_, "invalid_grant") => IdentityError::InvalidCredentials,
        (_, "user_already_exists") | (_, "email_exists") => IdentityError::AlreadyRegistered,
        (StatusCode::UNPROCESSABLE_ENTITY, _) if message.contains("already registered") => {
            IdentityError::AlreadyRegistered
        }
        _ => IdentityError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}

/// Sign-up returns the user either at the top level or under `user`, depending on
/// whether the project auto-confirms e-mail.
fn user_from_signup(body: Value) -> Result<IdentityUser, IdentityError> {
    let user = match body.get("user") {
        Some(u) if u.is_object() => u.clone(),
        _ => body,
    };
    serde_json::from_value(user).map_err(|e| IdentityError::Upstream {
        status: 200,
        message: format!("unexpected sign-up response: {}", e),
    })
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityUser, IdentityError> {
        let resp = self
            .http
            .post(self.url("/signup"))
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body = Self::read_json(resp).await?;
        let user = user_from_signup(body)?;
        tracing::info!(user_id = %user.id, "identity user created");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let resp = self
            .http
            .post(self.url("/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body = Self::read_json(resp).await?;
        serde_json::from_value(body).map_err(|e| IdentityError::Upstream {
            status: 200,
            message: format!("unexpected token response: {}", e),
        })
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let resp = self
            .http
            .post(self.url("/recover"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        Self::read_json(resp).await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        let resp = self
            .http
            .delete(self.url(&format!("/admin/users/{}", user_id)))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await?;
        Self::read_json(resp).await?;
        tracing::info!(user_id = %user_id, "identity user deleted");
        Ok(())
    }
}
