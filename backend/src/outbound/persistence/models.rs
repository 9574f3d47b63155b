//! Internal Diesel row structs.
//!
//! Implementation details of the persistence layer; adapters convert them
//! into validated domain types before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::StoredUser;
use crate::domain::{
    Email, Miniature, MiniatureDetails, MiniatureId, PasswordHash, Role, User, UserId, Username,
};

use super::schema::{collection_entries, miniatures, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    #[expect(dead_code, reason = "audit column not surfaced by the domain")]
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Validate the row into a domain user.
    pub(crate) fn into_user(self) -> Result<User, String> {
        Ok(self.into_stored()?.user)
    }

    /// Validate the row into a user with their password hash.
    pub(crate) fn into_stored(self) -> Result<StoredUser, String> {
        let role = self.role.parse::<Role>().map_err(|err| err.to_string())?;
        let username = Username::new(&self.username).map_err(|err| err.to_string())?;
        let email = Email::new(&self.email).map_err(|err| err.to_string())?;
        Ok(StoredUser {
            user: User::new(UserId::from_uuid(self.id), username, email, role),
            password_hash: PasswordHash::new(self.password_hash),
        })
    }
}

/// Insert payload for `users`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row read from `miniatures`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = miniatures)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MiniatureRow {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub scale: String,
    pub year: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl MiniatureRow {
    /// Validate the row into a domain miniature.
    pub(crate) fn into_miniature(self) -> Result<Miniature, String> {
        let details =
            MiniatureDetails::try_from_parts(&self.name, &self.brand, &self.scale, &self.year)
                .map_err(|err| format!("miniature {}: {err}", self.id))?;
        Ok(Miniature::new(
            MiniatureId::new(self.id),
            details,
            self.created_by.map(UserId::from_uuid),
            self.created_at,
        ))
    }
}

/// Insert payload for `miniatures`; the id comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = miniatures)]
pub(crate) struct NewMiniatureRow<'a> {
    pub name: &'a str,
    pub brand: &'a str,
    pub scale: &'a str,
    pub year: &'a str,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Editable `miniatures` columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = miniatures)]
pub(crate) struct MiniatureChangeset<'a> {
    pub name: &'a str,
    pub brand: &'a str,
    pub scale: &'a str,
    pub year: &'a str,
}

impl<'a> From<&'a MiniatureDetails> for MiniatureChangeset<'a> {
    fn from(details: &'a MiniatureDetails) -> Self {
        Self {
            name: details.name(),
            brand: details.brand(),
            scale: details.scale(),
            year: details.year(),
        }
    }
}

/// Insert payload for `collection_entries`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collection_entries)]
pub(crate) struct NewMembershipRow {
    pub user_id: Uuid,
    pub miniature_id: i64,
    pub added_at: DateTime<Utc>,
}
