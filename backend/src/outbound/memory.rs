//! In-memory store implementing every repository port.
//!
//! Used when no database URL is configured and by tests. All state sits
//! behind one mutex, so each port call (retiring a miniature together with
//! its memberships included) is a single critical section and the
//! `(user, miniature)` uniqueness check cannot race with a concurrent insert.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    MembershipRepository, MembershipRepositoryError, MiniatureRepository,
    MiniatureRepositoryError, NewMiniature, StoredUser, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AddOutcome, CollectionEntry, Membership, Miniature, MiniatureDetails, MiniatureId,
    PasswordHash, RemoveOutcome, Role, User, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, StoredUser>,
    miniatures: BTreeMap<MiniatureId, Miniature>,
    last_miniature_id: i64,
    memberships: BTreeMap<(UserId, MiniatureId), DateTime<Utc>>,
}

/// Process-local store for users, miniatures and memberships.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, State>> {
        self.state.lock().ok()
    }

    /// Number of stored memberships across all users; `None` once the lock
    /// is poisoned.
    pub fn membership_count(&self) -> Option<usize> {
        self.lock().map(|state| state.memberships.len())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| UserRepositoryError::query(POISONED))?;
        for stored in state.users.values() {
            if stored.user.username() == user.username() {
                return Err(UserRepositoryError::duplicate_username(
                    user.username().as_ref(),
                ));
            }
            if stored.user.email() == user.email() {
                return Err(UserRepositoryError::duplicate_email(user.email().as_ref()));
            }
        }
        state.users.insert(
            *user.id(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| UserRepositoryError::query(POISONED))?;
        Ok(state.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| UserRepositoryError::query(POISONED))?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.username().as_ref() == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| UserRepositoryError::query(POISONED))?;
        let mut users: Vec<User> = state
            .users
            .values()
            .map(|stored| stored.user.clone())
            .collect();
        users.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        Ok(users)
    }

    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| UserRepositoryError::query(POISONED))?;
        Ok(state.users.get_mut(id).map(|stored| {
            stored.user = stored.user.clone().with_role(role);
            stored.user.clone()
        }))
    }
}

#[async_trait]
impl MiniatureRepository for InMemoryStore {
    async fn insert(
        &self,
        miniature: &NewMiniature,
    ) -> Result<Miniature, MiniatureRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| MiniatureRepositoryError::query(POISONED))?;
        state.last_miniature_id += 1;
        let id = MiniatureId::new(state.last_miniature_id);
        let created = Miniature::new(
            id,
            miniature.details.clone(),
            miniature.created_by,
            miniature.created_at,
        );
        state.miniatures.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(
        &self,
        id: MiniatureId,
    ) -> Result<Option<Miniature>, MiniatureRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| MiniatureRepositoryError::query(POISONED))?;
        Ok(state.miniatures.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Miniature>, MiniatureRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| MiniatureRepositoryError::query(POISONED))?;
        Ok(state.miniatures.values().rev().cloned().collect())
    }

    async fn update(
        &self,
        id: MiniatureId,
        details: &MiniatureDetails,
    ) -> Result<Option<Miniature>, MiniatureRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| MiniatureRepositoryError::query(POISONED))?;
        Ok(state.miniatures.get_mut(&id).map(|stored| {
            *stored = stored.clone().with_details(details.clone());
            stored.clone()
        }))
    }
}

#[async_trait]
impl MembershipRepository for InMemoryStore {
    async fn insert_if_absent(
        &self,
        membership: &Membership,
    ) -> Result<AddOutcome, MembershipRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| MembershipRepositoryError::query(POISONED))?;
        match state
            .memberships
            .entry((membership.user_id, membership.miniature_id))
        {
            Entry::Occupied(_) => Ok(AddOutcome::AlreadyPresent),
            Entry::Vacant(slot) => {
                slot.insert(membership.added_at);
                Ok(AddOutcome::Added)
            }
        }
    }

    async fn delete(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<RemoveOutcome, MembershipRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| MembershipRepositoryError::query(POISONED))?;
        Ok(match state.memberships.remove(&(*user_id, miniature_id)) {
            Some(_) => RemoveOutcome::Removed,
            None => RemoveOutcome::NotPresent,
        })
    }

    async fn exists(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<bool, MembershipRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| MembershipRepositoryError::query(POISONED))?;
        Ok(state.memberships.contains_key(&(*user_id, miniature_id)))
    }

    async fn entries_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionEntry>, MembershipRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| MembershipRepositoryError::query(POISONED))?;
        Ok(state
            .memberships
            .iter()
            .filter(|((owner, _), _)| owner == user_id)
            .filter_map(|((_, miniature_id), added_at)| {
                state
                    .miniatures
                    .get(miniature_id)
                    .map(|miniature| CollectionEntry {
                        miniature: miniature.clone(),
                        added_at: *added_at,
                    })
            })
            .collect())
    }

    async fn collected_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<MiniatureId>, MembershipRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| MembershipRepositoryError::query(POISONED))?;
        Ok(state
            .memberships
            .keys()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, miniature_id)| *miniature_id)
            .collect())
    }

    async fn retire_miniature(
        &self,
        miniature_id: MiniatureId,
    ) -> Result<Option<usize>, MembershipRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| MembershipRepositoryError::query(POISONED))?;
        if state.miniatures.remove(&miniature_id).is_none() {
            return Ok(None);
        }
        let before = state.memberships.len();
        state.memberships.retain(|(_, id), _| *id != miniature_id);
        Ok(Some(before - state.memberships.len()))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
