use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::errors::ModelError;
use crate::id::RecordId;
use crate::record::Record;
use crate::user::User;
use crate::validation::{check_char_len, Validate};

pub const CONTENT_MIN: usize = 1;
pub const CONTENT_MAX: usize = 256;

/// A stored tweet. `by` is a copy of the author taken at post time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub tweet_id: RecordId,
    pub content: String,
    #[serde(with = "codec::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "codec::timestamp_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    pub by: User,
}

/// Post payload; `created_at` is stamped by the service when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTweet {
    pub tweet_id: RecordId,
    pub content: String,
    #[serde(default, with = "codec::timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "codec::timestamp_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    pub by: User,
}

/// Content update form.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetContent {
    pub content: String,
}

impl NewTweet {
    pub fn into_tweet(self, now: DateTime<Utc>) -> Tweet {
        Tweet {
            tweet_id: self.tweet_id,
            content: self.content,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at,
            by: self.by,
        }
    }
}

pub fn validate_content(content: &str) -> Result<(), ModelError> {
    check_char_len("content", content, CONTENT_MIN, CONTENT_MAX)
}

impl Validate for Tweet {
    fn validate(&self) -> Result<(), ModelError> {
        validate_content(&self.content)?;
        self.by.validate()
    }
}

impl Validate for NewTweet {
    fn validate(&self) -> Result<(), ModelError> {
        validate_content(&self.content)?;
        self.by.validate()
    }
}

impl Validate for TweetContent {
    fn validate(&self) -> Result<(), ModelError> {
        validate_content(&self.content)
    }
}

impl Record for Tweet {
    const KIND: &'static str = "tweet";

    fn key(&self) -> &RecordId {
        &self.tweet_id
    }
}
