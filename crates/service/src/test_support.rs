#![cfg(test)]
use std::path::PathBuf;

use models::tweet::NewTweet;
use models::user::{User, UserRegister};
use models::RecordId;
use uuid::Uuid;

/// Unique file path under the system temp dir; tests clean up after themselves.
pub fn temp_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}_{}.json", Uuid::new_v4()))
}

fn id(raw: &str) -> RecordId {
    RecordId::parse(raw).expect("valid test id")
}

pub fn user(user_id: &str, email: &str) -> UserRegister {
    UserRegister {
        user_id: id(user_id),
        email: email.to_string(),
        password: "password1".to_string(),
        first_name: "A".to_string(),
        last_name: "B".to_string(),
        birth_date: None,
    }
}

pub fn author(user_id: &str) -> User {
    user(user_id, &format!("{user_id}@example.com")).public()
}

pub fn new_tweet(tweet_id: &str, content: &str, by: User) -> NewTweet {
    NewTweet {
        tweet_id: id(tweet_id),
        content: content.to_string(),
        created_at: None,
        updated_at: None,
        by,
    }
}
