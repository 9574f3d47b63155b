//! Application settings loaded via OrthoConfig.
//!
//! Values come from `MINIPEDIA_*` environment variables, CLI flags and config
//! files. Optional fields fall back to the defaults below when unset.

use std::net::SocketAddr;

use color_eyre::eyre::{Result, WrapErr};
use minipedia::domain::{CollectionOrdering, CreatorPolicy, Registration};
use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@minipedia.com";
const LEGACY_DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MINIPEDIA")]
pub struct AppSettings {
    /// PostgreSQL connection string; unset selects the in-memory store.
    pub database_url: Option<String>,
    /// Listen address.
    pub bind_addr: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// `any`, or comma-separated roles allowed to create miniatures.
    pub creator_roles: Option<String>,
    /// `newest_item`, `recently_added` or `item_created`.
    pub collection_ordering: Option<String>,
    /// Username of the administrator created at startup.
    pub bootstrap_admin_username: Option<String>,
    /// Email of the administrator created at startup.
    pub bootstrap_admin_email: Option<String>,
    /// Password of the administrator created at startup; unset skips it.
    pub bootstrap_admin_password: Option<String>,
}

impl AppSettings {
    /// Configured database URL, else the conventional `DATABASE_URL`.
    pub fn database_url<E: Env>(&self, env: &E) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| env.string(LEGACY_DATABASE_URL_ENV))
            .filter(|url| !url.trim().is_empty())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .wrap_err_with(|| format!("invalid bind address '{raw}'"))
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn creator_policy(&self) -> Result<CreatorPolicy> {
        self.creator_roles
            .as_deref()
            .map_or_else(|| Ok(CreatorPolicy::default()), str::parse)
            .wrap_err("invalid creator_roles")
    }

    pub fn collection_ordering(&self) -> Result<CollectionOrdering> {
        self.collection_ordering
            .as_deref()
            .map_or_else(|| Ok(CollectionOrdering::default()), str::parse)
            .wrap_err("invalid collection_ordering")
    }

    /// Registration for the startup administrator, when a password is set.
    pub fn bootstrap_admin(&self) -> Result<Option<Registration>> {
        let Some(password) = self.bootstrap_admin_password.as_deref() else {
            return Ok(None);
        };
        let username = self
            .bootstrap_admin_username
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERNAME);
        let email = self
            .bootstrap_admin_email
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_EMAIL);
        Registration::try_from_parts(username, email, password)
            .map(Some)
            .wrap_err("invalid bootstrap administrator")
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings loading and defaults.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use minipedia::domain::Role;
    use mockable::MockEnv;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 8] = [
        "MINIPEDIA_DATABASE_URL",
        "MINIPEDIA_BIND_ADDR",
        "MINIPEDIA_POOL_MAX_SIZE",
        "MINIPEDIA_CREATOR_ROLES",
        "MINIPEDIA_COLLECTION_ORDERING",
        "MINIPEDIA_BOOTSTRAP_ADMIN_USERNAME",
        "MINIPEDIA_BOOTSTRAP_ADMIN_EMAIL",
        "MINIPEDIA_BOOTSTRAP_ADMIN_PASSWORD",
    ];

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("minipedia")]).expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn no_database_env() -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(|_| None);
        env
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));
        let settings = load();

        assert_eq!(settings.database_url(&no_database_env()), None);
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert_eq!(
            settings.creator_policy().expect("policy"),
            CreatorPolicy::default()
        );
        assert_eq!(
            settings.collection_ordering().expect("ordering"),
            CollectionOrdering::NewestItem
        );
        assert!(settings.bootstrap_admin().expect("bootstrap").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("MINIPEDIA_BIND_ADDR", "127.0.0.1:9000"),
            ("MINIPEDIA_POOL_MAX_SIZE", "3"),
            ("MINIPEDIA_CREATOR_ROLES", "any"),
            ("MINIPEDIA_COLLECTION_ORDERING", "recently_added"),
            ("MINIPEDIA_BOOTSTRAP_ADMIN_PASSWORD", "changeme"),
        ]));
        let settings = load();

        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        assert_eq!(settings.pool_max_size(), 3);
        assert!(settings.creator_policy().expect("policy").allows(Role::Viewer));
        assert_eq!(
            settings.collection_ordering().expect("ordering"),
            CollectionOrdering::RecentlyAdded
        );
        let admin = settings
            .bootstrap_admin()
            .expect("bootstrap")
            .expect("admin configured");
        assert_eq!(admin.username().as_ref(), "admin");
        assert_eq!(admin.email().as_ref(), "admin@minipedia.com");
    }

    #[rstest]
    fn database_url_falls_back_to_conventional_variable() {
        let _guard = lock_env(env_with(&[]));
        let settings = load();
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(|name| (name == "DATABASE_URL").then(|| "postgres://db/minipedia".to_owned()));

        assert_eq!(
            settings.database_url(&env).as_deref(),
            Some("postgres://db/minipedia")
        );
    }

    #[rstest]
    #[case("MINIPEDIA_CREATOR_ROLES", "wizard")]
    #[case("MINIPEDIA_COLLECTION_ORDERING", "alphabetical")]
    #[case("MINIPEDIA_BIND_ADDR", "not-an-address")]
    fn malformed_values_are_reported(#[case] var: &str, #[case] value: &str) {
        let _guard = lock_env(env_with(&[(var, value)]));
        let settings = load();

        let failures = [
            settings.creator_policy().is_err(),
            settings.collection_ordering().is_err(),
            settings.bind_addr().is_err(),
        ];
        assert_eq!(failures.iter().filter(|failed| **failed).count(), 1);
    }
}
