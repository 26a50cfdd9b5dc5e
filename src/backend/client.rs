//! HTTP client for the Supabase-compatible backend

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::{AuthProvider, BackendError, EnergyReportSource, UserDirectory};
use crate::config::BackendConfig;
use crate::models::{AuthSession, AuthUser, EnergyReportRow, UserProfile};

const UNIQUE_VIOLATION: &str = "23505";
const REPORT_COLUMNS: &str = "report_date,street_light_id,energy_consumed_kwh,energy_saved_kwh";

/// Talks to the auth (`/auth/v1`) and REST (`/rest/v1`) endpoints
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    client: Client,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(BackendClient {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: None,
            client,
        })
    }

    /// Act on behalf of a signed-in user instead of the anonymous role
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn auth_request(&self, path: &str, email: &str, password: &str) -> Result<Value, BackendError> {
        let response = self
            .request(Method::POST, path)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Value>().await?);
        }

        let message = error_message(response).await;
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED if path.starts_with("/auth/v1/token") => {
                Err(BackendError::InvalidCredentials(message))
            }
            _ => Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

impl AuthProvider for BackendClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let body = self
            .auth_request("/auth/v1/token?grant_type=password", email, password)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let body = self.auth_request("/auth/v1/signup", email, password).await?;

        // With email confirmation enabled the bare user comes back, no session
        if body.get("user").is_some() {
            Ok(serde_json::from_value(body)?)
        } else {
            let user: AuthUser = serde_json::from_value(body)?;
            Ok(AuthSession {
                access_token: None,
                user,
            })
        }
    }
}

impl UserDirectory for BackendClient {
    async fn find_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        let filter = format!("eq.{}", user_id);
        let response = self
            .request(Method::GET, "/rest/v1/users")
            .query(&[
                ("user_id", filter.as_str()),
                ("select", "first_name,last_name,email"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        let mut profiles: Vec<UserProfile> = response.json().await?;
        Ok(if profiles.is_empty() {
            None
        } else {
            Some(profiles.swap_remove(0))
        })
    }

    async fn insert_user_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, "/rest/v1/users")
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({
                "user_id": user_id,
                "first_name": profile.first_name,
                "last_name": profile.last_name,
                "email": profile.email,
            }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<Value> = serde_json::from_str(&body).ok();
        let code = parsed
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(Value::as_str);

        if status == StatusCode::CONFLICT || code == Some(UNIQUE_VIOLATION) {
            return Err(BackendError::AlreadyExists);
        }

        Err(BackendError::Rejected {
            status: status.as_u16(),
            message: parsed.as_ref().map(message_from_json).unwrap_or(body),
        })
    }
}

impl EnergyReportSource for BackendClient {
    async fn fetch_energy_reports(&self) -> Result<Vec<EnergyReportRow>, BackendError> {
        let response = self
            .request(Method::GET, "/rest/v1/energy_reports")
            .query(&[("select", REPORT_COLUMNS), ("order", "report_date.asc")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        Ok(response.json().await?)
    }
}

async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => message_from_json(&value),
        Err(_) => body,
    }
}

fn message_from_json(value: &Value) -> String {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_client(server: &MockServer) -> BackendClient {
        BackendClient::new(&BackendConfig {
            url: format!("{}/", server.uri()),
            anon_key: "anon-key".to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .and(body_json(json!({ "email": "ops@arc-lite.com", "password": "Str0ng!Pass" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt-token",
                "token_type": "bearer",
                "user": { "id": "u-1", "email": "ops@arc-lite.com" }
            })))
            .mount(&server)
            .await;

        let session = create_client(&server)
            .sign_in("ops@arc-lite.com", "Str0ng!Pass")
            .await
            .unwrap();

        assert_eq!(session.access_token.as_deref(), Some("jwt-token"));
        assert_eq!(session.user.id, "u-1");
    }

    #[tokio::test]
    async fn test_sign_in_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let err = create_client(&server)
            .sign_in("ops@arc-lite.com", "wrong")
            .await
            .unwrap_err();

        match err {
            BackendError::InvalidCredentials(msg) => assert_eq!(msg, "Invalid login credentials"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_up_without_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u-2",
                "email": "new@arc-lite.com",
                "confirmation_sent_at": "2024-01-15T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let session = create_client(&server)
            .sign_up("new@arc-lite.com", "Str0ng!Pass")
            .await
            .unwrap();

        assert!(session.access_token.is_none());
        assert_eq!(session.user.id, "u-2");
    }

    #[tokio::test]
    async fn test_sign_up_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "msg": "User already registered" })),
            )
            .mount(&server)
            .await;

        let err = create_client(&server)
            .sign_up("ops@arc-lite.com", "Str0ng!Pass")
            .await
            .unwrap_err();

        match err {
            BackendError::Rejected { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "User already registered");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_energy_reports() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/energy_reports"))
            .and(query_param("order", "report_date.asc"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "report_date": "2024-01-15",
                    "street_light_id": "SL001",
                    "energy_consumed_kwh": 12.5,
                    "energy_saved_kwh": 3.2
                }
            ])))
            .mount(&server)
            .await;

        let rows = create_client(&server).fetch_energy_reports().await.unwrap();

        assert_eq!(rows, vec![EnergyReportRow::new("2024-01-15", "SL001", 12.5, 3.2)]);
    }

    #[tokio::test]
    async fn test_find_user_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("user_id", "eq.u-1"))
            .and(header("authorization", "Bearer user-jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "first_name": "Ada", "last_name": "Lovelace", "email": "ada@arc-lite.com" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("user_id", "eq.u-404"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = create_client(&server).with_access_token("user-jwt");

        let profile = client.find_user_profile("u-1").await.unwrap().unwrap();
        assert_eq!(profile.first_name, "Ada");
        assert!(client.find_user_profile("u-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint \"users_email_key\""
            })))
            .mount(&server)
            .await;

        let profile = UserProfile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@arc-lite.com".to_string(),
        };
        let err = create_client(&server)
            .insert_user_profile("u-1", &profile)
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_insert_profile_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .and(header("prefer", "return=minimal"))
            .and(body_json(json!({
                "user_id": "u-1",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@arc-lite.com"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let profile = UserProfile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@arc-lite.com".to_string(),
        };
        create_client(&server)
            .insert_user_profile("u-1", &profile)
            .await
            .unwrap();
    }

    #[test]
    fn test_message_from_json_fallbacks() {
        assert_eq!(message_from_json(&json!({ "msg": "a" })), "a");
        assert_eq!(message_from_json(&json!({ "message": "b", "error": "c" })), "b");
        assert_eq!(message_from_json(&json!({ "other": 1 })), "{\"other\":1}");
    }
}
