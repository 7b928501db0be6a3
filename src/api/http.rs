//! Reqwest-backed directory client.
//!
//! Owns transport details only: URL construction, timeout, status mapping and
//! JSON decoding into [`User`]/[`Post`] records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use super::{DirectoryClient, Post, User, UserId};
use crate::error::FetchError;

const USER_AGENT: &str = concat!("userposts-dashboard/", env!("CARGO_PKG_VERSION"));

/// Directory client issuing plain `GET` requests against one base URL.
#[derive(Clone, Debug)]
pub struct HttpDirectory {
    client: Client,
    base: Url,
}

impl HttpDirectory {
    /// Build a client for `base_url` with an overall per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base = normalize_base(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/users`
    pub fn users_url(&self) -> Result<Url, FetchError> {
        join(&self.base, "users")
    }

    /// `{base}/posts?userId={id}`
    pub fn posts_url(&self, user_id: UserId) -> Result<Url, FetchError> {
        let mut url = join(&self.base, "posts")?;
        url.query_pairs_mut()
            .append_pair("userId", &user_id.to_string());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        tracing::debug!(%url, bytes = body.len(), "response received");
        Ok(serde_json::from_slice(body.as_ref())?)
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectory {
    async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        let url = self.users_url()?;
        self.get_json(url).await
    }

    async fn fetch_posts(&self, user_id: UserId) -> Result<Vec<Post>, FetchError> {
        let url = self.posts_url(user_id)?;
        self.get_json(url).await
    }
}

// Url::join replaces the last path segment unless the base ends with '/'.
fn normalize_base(base_url: &str) -> Result<Url, FetchError> {
    let with_slash = format!("{}/", base_url.trim().trim_end_matches('/'));
    Url::parse(&with_slash).map_err(|e| FetchError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

fn join(base: &Url, path: &str) -> Result<Url, FetchError> {
    base.join(path).map_err(|e| FetchError::InvalidUrl {
        url: format!("{base}{path}"),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(base: &str) -> HttpDirectory {
        HttpDirectory::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoints_are_built_from_bare_host() {
        let d = dir("https://jsonplaceholder.typicode.com");
        assert_eq!(
            d.users_url().unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/users"
        );
        assert_eq!(
            d.posts_url(UserId::from(4)).unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/posts?userId=4"
        );
    }

    #[test]
    fn text_user_id_is_passed_through() {
        let d = dir("http://localhost:3000");
        assert_eq!(
            d.posts_url(UserId::from("a1")).unwrap().as_str(),
            "http://localhost:3000/posts?userId=a1"
        );
    }

    #[test]
    fn base_path_is_preserved_with_or_without_trailing_slash() {
        for base in ["http://localhost:8080/api", "http://localhost:8080/api/"] {
            let d = dir(base);
            assert_eq!(
                d.users_url().unwrap().as_str(),
                "http://localhost:8080/api/users"
            );
        }
    }

    #[test]
    fn garbage_base_url_is_rejected() {
        let err = HttpDirectory::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.kind(), "invalid_url");
    }
}
