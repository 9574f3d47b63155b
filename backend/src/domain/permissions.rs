//! Permission predicates gating catalogue mutation.

use tracing::info;

use super::{CreatorPolicy, Error, Miniature, User};

/// Decides who may create, edit or delete catalogue entries.
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    creator_policy: CreatorPolicy,
}

impl PermissionGate {
    /// Build a gate around the configured creator policy.
    pub fn new(creator_policy: CreatorPolicy) -> Self {
        Self { creator_policy }
    }

    /// Configured creator policy.
    pub fn creator_policy(&self) -> &CreatorPolicy {
        &self.creator_policy
    }

    /// True when `user` created `item` or is an administrator.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use minipedia::domain::{
    ///     Miniature, MiniatureDetails, MiniatureId, PermissionGate, Role, User,
    /// };
    ///
    /// let ana = User::try_from_strings(
    ///     "3fa85f64-5717-4562-b3fc-2c963f66afa6", "ana", "ana@example.com", Role::User,
    /// ).unwrap();
    /// let details = MiniatureDetails::try_from_parts("GT-R", "Tomica", "1:64", "1999").unwrap();
    /// let item = Miniature::new(MiniatureId::new(7), details, Some(*ana.id()), Utc::now());
    /// assert!(PermissionGate::default().can_mutate(&ana, &item));
    /// ```
    #[must_use]
    pub fn can_mutate(&self, user: &User, item: &Miniature) -> bool {
        user.role().is_admin() || item.created_by() == Some(user.id())
    }

    /// True when the user's role is in the creator-allowed set.
    #[must_use]
    pub fn can_create_item(&self, user: &User) -> bool {
        self.creator_policy.allows(user.role())
    }

    /// [`Self::can_mutate`] as a guard returning `Forbidden`.
    pub fn require_mutate(&self, user: &User, item: &Miniature) -> Result<(), Error> {
        if self.can_mutate(user, item) {
            return Ok(());
        }
        info!(
            user_id = %user.id(),
            miniature_id = %item.id(),
            "miniature mutation denied"
        );
        Err(Error::forbidden("only the creator or an admin may change this miniature"))
    }

    /// [`Self::can_create_item`] as a guard returning `Forbidden`.
    pub fn require_create(&self, user: &User) -> Result<(), Error> {
        if self.can_create_item(user) {
            return Ok(());
        }
        info!(
            user_id = %user.id(),
            role = %user.role(),
            "miniature creation denied"
        );
        Err(Error::forbidden("your role may not add miniatures"))
    }
}
