use std::sync::Arc;

use configs::StorageConfig;
use service::{
    tweets::{TweetService, TweetStore},
    users::{UserService, UserStore},
    ServiceError,
};

/// Services shared by every handler. One store per collection file, opened
/// once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub tweets: TweetService,
}

impl AppState {
    pub async fn from_config(storage: &StorageConfig) -> Result<Self, ServiceError> {
        let users = UserStore::open(storage.users_path()).await?;
        let tweets = TweetStore::open(storage.tweets_path()).await?;
        Ok(Self::new(users, tweets, storage.password_scheme))
    }

    pub fn new(users: Arc<UserStore>, tweets: Arc<TweetStore>, scheme: configs::PasswordScheme) -> Self {
        Self {
            users: UserService::new(users, scheme),
            tweets: TweetService::new(tweets),
        }
    }
}
