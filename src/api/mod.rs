//! Remote directory: data model and the client seam.
//!
//! The dashboard talks to the directory only through [`DirectoryClient`], so
//! the HTTP implementation in [`http`] can be swapped for an in-memory one in
//! tests.

pub mod http;

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::FetchError;

pub use http::HttpDirectory;

/// Public demo directory used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Record identifier as the directory sends it.
///
/// JSONPlaceholder uses numbers, json-server style mirrors often use strings.
/// The value is never interpreted, only compared and written back.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(u64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{n}"),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Num(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Id);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self(Id::Num(n))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(Id::from(s))
            }
        }
    };
}

opaque_id!(
    /// Opaque user identifier, passed back to the posts endpoint verbatim.
    UserId
);
opaque_id!(PostId);

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    pub street: String,
    #[serde(default)]
    pub suite: String,
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default, rename = "catchPhrase")]
    pub catch_phrase: String,
    #[serde(default)]
    pub bs: String,
}

/// A person record from the `/users` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub address: Address,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    pub company: Company,
}

/// A short text record from the `/posts` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub title: String,
    pub body: String,
}

/// Read access to the remote user directory.
#[async_trait]
pub trait DirectoryClient: Send + Sync + 'static {
    /// `GET /users`: the full user list, no parameters.
    async fn fetch_users(&self) -> Result<Vec<User>, FetchError>;

    /// `GET /posts?userId={id}`: posts filtered server-side to one user.
    async fn fetch_posts(&self, user_id: UserId) -> Result<Vec<Post>, FetchError>;
}
