use std::sync::Arc;

use chrono::Utc;
use models::tweet::{validate_content, NewTweet, Tweet};
use models::validation::Validate;
use models::RecordId;
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::JsonCollectionStore;

pub type TweetStore = JsonCollectionStore<Tweet>;

/// Post, read, edit and delete tweets.
#[derive(Clone)]
pub struct TweetService {
    store: Arc<TweetStore>,
}

impl TweetService {
    pub fn new(store: Arc<TweetStore>) -> Self {
        Self { store }
    }

    /// Store a new tweet. `created_at` defaults to now; `by` is kept as the
    /// author snapshot sent with the post.
    pub async fn post(&self, input: NewTweet) -> Result<Tweet, ServiceError> {
        input.validate()?;
        let tweet = self.store.insert(input.into_tweet(Utc::now())).await?;
        info!(tweet_id = %tweet.tweet_id, author = %tweet.by.user_id, "tweet posted");
        Ok(tweet)
    }

    pub async fn list(&self) -> Result<Vec<Tweet>, ServiceError> {
        self.store.list().await
    }

    pub async fn get(&self, tweet_id: &RecordId) -> Result<Tweet, ServiceError> {
        self.store.get(tweet_id).await
    }

    /// Replace only the content and stamp `updated_at`.
    pub async fn update_content(&self, tweet_id: &RecordId, content: String) -> Result<Tweet, ServiceError> {
        validate_content(&content)?;
        let updated = self
            .store
            .modify(tweet_id, |tweet| {
                tweet.content = content;
                tweet.updated_at = Some(Utc::now());
                Ok(())
            })
            .await?;
        info!(%tweet_id, "tweet updated");
        Ok(updated)
    }

    pub async fn delete(&self, tweet_id: &RecordId) -> Result<Tweet, ServiceError> {
        let removed = self.store.remove(tweet_id).await?;
        info!(%tweet_id, "tweet deleted");
        Ok(removed)
    }
}
