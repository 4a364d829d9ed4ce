//! Clerk backend API adapter
//!
//! Supplies the users' linked Google OAuth tokens and the user listing for
//! the reminder batch.

use async_trait::async_trait;
use brief_core::{AccessTokenProvider, UserDirectory};
use brief_domain::{Result, UserRecord};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::http::HttpClient;

/// Clerk backend API client.
pub struct ClerkClient {
    http: HttpClient,
    base_url: String,
    secret_key: String,
}

impl ClerkClient {
    /// Client authenticated with the Clerk secret key.
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>, http: HttpClient) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    async fn get_list<T>(&self, url: String, query: &[(&str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let request = self
            .http
            .request(Method::GET, url)
            .bearer_auth(&self.secret_key)
            .query(query);
        let list: ListResponse<T> = self.http.send_json(request).await?;
        Ok(list.into_items())
    }
}

#[async_trait]
impl AccessTokenProvider for ClerkClient {
    #[instrument(skip(self))]
    async fn oauth_access_token(&self, user_id: &str, provider: &str) -> Result<Option<String>> {
        let provider = if provider.starts_with("oauth_") {
            provider.to_string()
        } else {
            format!("oauth_{provider}")
        };
        let url = format!("{}/users/{user_id}/oauth_access_tokens/{provider}", self.base_url);

        let tokens: Vec<OauthToken> = self.get_list(url, &[]).await?;
        debug!(grants = tokens.len(), "OAuth tokens fetched");

        Ok(tokens.into_iter().next().map(|t| t.token).filter(|t| !t.is_empty()))
    }
}

#[async_trait]
impl UserDirectory for ClerkClient {
    async fn list_users(&self, limit: u32) -> Result<Vec<UserRecord>> {
        let url = format!("{}/users", self.base_url);
        let users: Vec<ClerkUser> = self.get_list(url, &[("limit", limit.to_string())]).await?;

        Ok(users
            .into_iter()
            .map(|user| UserRecord {
                email: user.email_addresses.into_iter().next().map(|e| e.email_address),
                id: user.id,
            })
            .collect())
    }
}

/// Clerk answers list endpoints either with a bare array or a paginated
/// `{ "data": [...] }` envelope depending on API version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Bare(Vec<T>),
    Paginated { data: Vec<T> },
}

impl<T> ListResponse<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Paginated { data: items } => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OauthToken {
    #[serde(default)]
    token: String,
}

#[derive(Debug, Deserialize)]
struct ClerkUser {
    id: String,
    #[serde(default)]
    email_addresses: Vec<ClerkEmail>,
}

#[derive(Debug, Deserialize)]
struct ClerkEmail {
    email_address: String,
}

#[cfg(test)]
mod tests {
    use brief_domain::BriefError;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> ClerkClient {
        let http = HttpClient::builder().max_attempts(1).build().unwrap();
        ClerkClient::new(server.uri(), "sk_test", http)
    }

    #[tokio::test]
    async fn token_lookup_reads_first_grant() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/user_1/oauth_access_tokens/oauth_google"))
            .and(header("authorization", "Bearer sk_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"token": "ya29.first", "provider": "oauth_google"},
                {"token": "ya29.second"}
            ])))
            .mount(&server)
            .await;

        let token = client(&server).oauth_access_token("user_1", "google").await.unwrap();
        assert_eq!(token.as_deref(), Some("ya29.first"));
    }

    #[tokio::test]
    async fn paginated_envelope_and_empty_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/user_2/oauth_access_tokens/oauth_google"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [{"token": ""}], "total_count": 1})),
            )
            .mount(&server)
            .await;

        let token = client(&server).oauth_access_token("user_2", "oauth_google").await.unwrap();
        assert_eq!(token, None);
    }

    #[tokio::test]
    async fn no_linked_account_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/user_3/oauth_access_tokens/oauth_google"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let token = client(&server).oauth_access_token("user_3", "google").await.unwrap();
        assert_eq!(token, None);
    }

    #[tokio::test]
    async fn rejected_secret_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = client(&server).oauth_access_token("user_1", "google").await.unwrap_err();
        assert!(matches!(err, BriefError::Auth(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn list_users_takes_first_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "user_1", "email_addresses": [
                    {"email_address": "ada@example.com"},
                    {"email_address": "ada@personal.example"}
                ]},
                {"id": "user_2", "email_addresses": []}
            ])))
            .mount(&server)
            .await;

        let users = client(&server).list_users(100).await.unwrap();
        assert_eq!(
            users,
            vec![
                UserRecord { id: "user_1".into(), email: Some("ada@example.com".into()) },
                UserRecord { id: "user_2".into(), email: None },
            ]
        );
    }
}
