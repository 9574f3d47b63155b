//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled only for tests or with the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{Miniature, MiniatureDetails, MiniatureId, Role, User, UserId};

/// Clock whose reading only changes when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fixed instant used across fixtures.
pub fn fixture_timestamp() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 2, 24, 10, 30, 0).single() {
        Some(timestamp) => timestamp,
        None => panic!("valid fixture timestamp"),
    }
}

/// Valid miniature attributes.
pub fn sample_details() -> MiniatureDetails {
    match MiniatureDetails::try_from_parts("Skyline GT-R R34", "Tomica", "1:64", "1999") {
        Ok(details) => details,
        Err(error) => panic!("sample details are valid: {error}"),
    }
}

/// A miniature with `id` created at [`fixture_timestamp`].
pub fn miniature(id: i64, created_by: Option<UserId>) -> Miniature {
    Miniature::new(
        MiniatureId::new(id),
        sample_details(),
        created_by,
        fixture_timestamp(),
    )
}

/// A user with a fresh id, the given login name and role.
pub fn user_with_role(username: &str, role: Role) -> User {
    match User::try_from_strings(
        UserId::random().to_string(),
        username,
        format!("{username}@example.com"),
        role,
    ) {
        Ok(user) => user,
        Err(error) => panic!("fixture user is valid: {error}"),
    }
}
