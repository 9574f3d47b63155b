//! Account domain service.
//!
//! Implements the account driving ports over a [`UserRepository`] and a
//! [`PasswordHasher`]. Hashing and verification run on the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AccountQuery, PasswordHasher, PasswordHasherError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Error, ErrorCode, LoginCredentials, PasswordHash, Registration, Role, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { .. } => {
            Error::conflict("username is already taken")
                .with_details(json!({ "field": "username", "code": "duplicate_username" }))
        }
        UserRepositoryError::DuplicateEmail { .. } => {
            Error::conflict("email is already registered")
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Resolve the session user, treating a vanished account as logged out.
pub(crate) async fn load_actor<U>(users: &U, id: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::unauthorized("login required"))
}

fn require_admin(actor: &User) -> Result<(), Error> {
    if actor.role().is_admin() {
        return Ok(());
    }
    info!(user_id = %actor.id(), role = %actor.role(), "admin operation denied");
    Err(Error::forbidden("administrator role required"))
}

/// Account service implementing [`AccountCommand`] and [`AccountQuery`].
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> Clone for AccountService<U, H> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    /// Create a service over the user store and password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }

    /// Create the bootstrap administrator unless its username is taken.
    ///
    /// Returns the new account, or `None` when an account with that username
    /// already exists (including one created concurrently).
    pub async fn ensure_bootstrap_admin(
        &self,
        admin: &Registration,
    ) -> Result<Option<User>, Error> {
        let existing = self
            .users
            .find_by_username(admin.username().as_ref())
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            debug!(username = %admin.username(), "bootstrap admin already present");
            return Ok(None);
        }
        match self.create_account(admin, Role::Admin).await {
            Ok(user) => {
                info!(user_id = %user.id(), username = %user.username(), "bootstrap admin created");
                Ok(Some(user))
            }
            Err(error) if error.code() == ErrorCode::Conflict => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn create_account(&self, registration: &Registration, role: Role) -> Result<User, Error> {
        let hash = self.hash_password(registration.password()).await?;
        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.email().clone(),
            role,
        );
        self.users
            .insert(&user, &hash)
            .await
            .map_err(map_user_error)?;
        Ok(user)
    }

    async fn hash_password(&self, password: &str) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hasher_error)
    }

    async fn verify_password(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?
            .map_err(map_hasher_error)
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let user = self.create_account(&registration, Role::User).await?;
        info!(user_id = %user.id(), username = %user.username(), "account registered");
        Ok(user)
    }

    async fn change_role(
        &self,
        actor: &UserId,
        target: &UserId,
        role: Role,
    ) -> Result<User, Error> {
        let actor = load_actor(self.users.as_ref(), actor).await?;
        require_admin(&actor)?;
        let updated = self
            .users
            .update_role(target, role)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {target} not found")))?;
        info!(actor = %actor.id(), target = %target, %role, "role changed");
        Ok(updated)
    }
}

#[async_trait]
impl<U, H> AccountQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(stored) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login rejected: unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !self
            .verify_password(credentials.password(), stored.password_hash)
            .await?
        {
            debug!(user_id = %stored.user.id(), "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(*stored.user.id())
    }

    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        load_actor(self.users.as_ref(), user_id).await
    }

    async fn list_users(&self, actor: &UserId) -> Result<Vec<User>, Error> {
        let actor = load_actor(self.users.as_ref(), actor).await?;
        require_admin(&actor)?;
        self.users.list_all().await.map_err(map_user_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
