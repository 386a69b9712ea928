use std::sync::Arc;

use models::user::{LoginResult, User, UserRegister};
use models::validation::Validate;
use models::RecordId;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::passwords::{self, PasswordScheme};
use crate::storage::JsonCollectionStore;

pub type UserStore = JsonCollectionStore<UserRegister>;

/// Signup, login and profile CRUD over the users collection.
#[derive(Clone)]
pub struct UserService {
    store: Arc<UserStore>,
    scheme: PasswordScheme,
}

fn same_email(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn email_taken(email: &str) -> ServiceError {
    ServiceError::Conflict(format!("email {email} is already registered"))
}

impl UserService {
    pub fn new(store: Arc<UserStore>, scheme: PasswordScheme) -> Self {
        Self { store, scheme }
    }

    /// Register a user. Conflict if the `user_id` or the email is taken.
    pub async fn register(&self, mut input: UserRegister) -> Result<User, ServiceError> {
        input.validate()?;
        input.password = passwords::encode(self.scheme, std::mem::take(&mut input.password)).await?;

        let created = self
            .store
            .insert_with(input, |users, new| {
                if users.iter().any(|u| same_email(&u.email, &new.email)) {
                    return Err(email_taken(&new.email));
                }
                Ok(())
            })
            .await?;
        info!(user_id = %created.user_id, "user registered");
        Ok(created.into())
    }

    /// Check an email/password pair. Bad credentials are a failed result,
    /// not an error; only storage failures are.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<LoginResult, ServiceError> {
        let users = self.store.list().await?;
        let mut matched = false;
        for user in users.into_iter().filter(|u| same_email(&u.email, email)) {
            if passwords::verify(self.scheme, password.to_string(), user.password).await? {
                matched = true;
                break;
            }
        }
        if matched {
            info!(%email, "login succeeded");
            Ok(LoginResult::ok(email))
        } else {
            warn!(%email, "login failed");
            Ok(LoginResult::failed())
        }
    }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.list().await?.into_iter().map(User::from).collect())
    }

    pub async fn get(&self, user_id: &RecordId) -> Result<User, ServiceError> {
        Ok(self.store.get(user_id).await?.into())
    }

    /// Overwrite the profile of `user_id`. The stored password is kept, and
    /// tweets already posted keep their author snapshot.
    pub async fn update(&self, user_id: &RecordId, user: User) -> Result<User, ServiceError> {
        user.validate()?;
        if &user.user_id != user_id {
            return Err(ServiceError::Validation(format!(
                "user_id {} in body does not match {user_id}",
                user.user_id
            )));
        }

        let updated = self
            .store
            .update_collection(|users| {
                if users
                    .iter()
                    .any(|u| &u.user_id != user_id && same_email(&u.email, &user.email))
                {
                    return Err(email_taken(&user.email));
                }
                let current = users
                    .iter_mut()
                    .find(|u| &u.user_id == user_id)
                    .ok_or_else(|| ServiceError::not_found("user", user_id))?;
                current.apply_profile(user);
                Ok(current.public())
            })
            .await?;
        info!(%user_id, "user updated");
        Ok(updated)
    }

    pub async fn delete(&self, user_id: &RecordId) -> Result<User, ServiceError> {
        let removed = self.store.remove(user_id).await?;
        info!(%user_id, "user deleted");
        Ok(removed.into())
    }
}
