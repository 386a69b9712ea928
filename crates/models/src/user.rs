use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::errors::ModelError;
use crate::id::RecordId;
use crate::record::Record;
use crate::validation::{check_char_len, Validate};

pub const NAME_MIN: usize = 1;
pub const NAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 69;

/// Public view of a user; never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: RecordId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, with = "codec::timestamp_opt")]
    pub birth_date: Option<DateTime<Utc>>,
}

/// Signup payload, and the record stored in the users collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegister {
    pub user_id: RecordId,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, with = "codec::timestamp_opt")]
    pub birth_date: Option<DateTime<Utc>>,
}

/// Login form.
#[derive(Debug, Clone, Deserialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    pub success: bool,
    pub message: String,
}

impl LoginResult {
    pub fn ok(email: &str) -> Self {
        Self { success: true, message: format!("login successful for {email}") }
    }

    pub fn failed() -> Self {
        Self { success: false, message: "invalid email or password".into() }
    }
}

impl UserRegister {
    pub fn public(&self) -> User {
        User {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: self.birth_date,
        }
    }

    /// Overwrite the profile fields from `user`, keeping the stored password.
    pub fn apply_profile(&mut self, user: User) {
        self.email = user.email;
        self.first_name = user.first_name;
        self.last_name = user.last_name;
        self.birth_date = user.birth_date;
    }
}

impl From<UserRegister> for User {
    fn from(u: UserRegister) -> Self {
        Self {
            user_id: u.user_id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            birth_date: u.birth_date,
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    crate::validation::validate_email(email)
}

pub fn validate_name(field: &str, name: &str) -> Result<(), ModelError> {
    check_char_len(field, name, NAME_MIN, NAME_MAX)
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    check_char_len("password", password, PASSWORD_MIN, PASSWORD_MAX)
}

impl Validate for User {
    fn validate(&self) -> Result<(), ModelError> {
        validate_email(&self.email)?;
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)
    }
}

impl Validate for UserRegister {
    fn validate(&self) -> Result<(), ModelError> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)
    }
}

impl Record for UserRegister {
    const KIND: &'static str = "user";

    fn key(&self) -> &RecordId {
        &self.user_id
    }
}
