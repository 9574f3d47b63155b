//! Cookie session settings read from the process environment.
//!
//! | Variable | Release build | Debug build |
//! |---|---|---|
//! | `SESSION_KEY_FILE` | key file must exist and hold at least 64 bytes | missing file yields a throwaway key |
//! | `SESSION_COOKIE_SECURE` | required boolean | defaults to `true` with a warning |
//! | `SESSION_SAMESITE` | required, `None` needs a secure cookie | defaults to `Lax` with a warning |
//! | `SESSION_ALLOW_EPHEMERAL` | required, must be false | defaults to `false` |

pub mod fingerprint;

use std::path::{Path, PathBuf};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use mockable::Env;
use tracing::{info, warn};
use zeroize::Zeroizing;

use self::fingerprint::key_fingerprint;

pub(crate) const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
pub(crate) const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_ENV: &str = "SESSION_SAMESITE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const DEFAULT_KEY_PATH: &str = "/var/run/secrets/session_key";
/// Shortest key file accepted by release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` panics below this length.
const KEY_DERIVE_MIN_LEN: usize = 32;
const SESSION_COOKIE_NAME: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Whether session toggles are enforced strictly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or malformed toggles fall back to defaults with a warning.
    Debug,
    /// Every toggle must be present and valid.
    Release,
}

impl BuildMode {
    /// Mode matching how this binary was compiled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use minipedia::inbound::http::session_config::BuildMode;
    ///
    /// let expected = if cfg!(debug_assertions) {
    ///     BuildMode::Debug
    /// } else {
    ///     BuildMode::Release
    /// };
    /// assert_eq!(BuildMode::current(), expected);
    /// ```
    #[must_use]
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie session settings.
#[derive(Clone)]
pub struct SessionSettings {
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

impl SessionSettings {
    /// Read and validate the session toggles from `env`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionConfigError`] when a release build finds a missing
    /// or invalid toggle, or when the key file cannot be used.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use minipedia::inbound::http::session_config::{BuildMode, SessionSettings};
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|_| None);
    ///
    /// let settings = SessionSettings::from_env(&env, BuildMode::Debug)
    ///     .expect("debug builds fall back to defaults");
    /// assert!(settings.cookie_secure());
    /// ```
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, SessionConfigError> {
        let toggles = Toggles { env, mode };
        let cookie_secure = toggles.flag(COOKIE_SECURE_ENV, true)?;
        let same_site = toggles.same_site(cookie_secure)?;
        let allow_ephemeral = toggles.flag(ALLOW_EPHEMERAL_ENV, false)?;
        if allow_ephemeral && !mode.is_debug() {
            return Err(SessionConfigError::EphemeralKeyInRelease);
        }
        let path = env
            .string(KEY_FILE_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_KEY_PATH), PathBuf::from);
        let key = load_key(&path, mode, allow_ephemeral)?;

        Ok(Self {
            key,
            cookie_secure,
            same_site,
        })
    }

    /// Whether cookies carry the `Secure` attribute.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// `SameSite` policy applied to the session cookie.
    #[must_use]
    pub fn same_site(&self) -> SameSite {
        self.same_site
    }

    /// Short hex digest identifying the active key.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        key_fingerprint(&self.key)
    }

    /// Build the private cookie session middleware for these settings.
    #[must_use]
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Session configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    /// A required toggle is unset.
    #[error("missing required environment variable: {var}")]
    Missing {
        /// Variable name.
        var: &'static str,
    },
    /// A toggle holds a value outside its accepted set.
    #[error("invalid value for {var}='{value}'; expected {expected}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {}: {source}", path.display())]
    KeyUnreadable {
        /// Key file location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The key file holds too few bytes.
    #[error("session key at {} too short: need >= {min_len} bytes, got {len}", path.display())]
    KeyTooShort {
        /// Key file location.
        path: PathBuf,
        /// Bytes found.
        len: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// `SameSite=None` was requested without a secure cookie.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    SameSiteNoneRequiresSecure,
    /// Release builds never run with a throwaway key.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralKeyInRelease,
}

struct Toggles<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> Toggles<'_, E> {
    /// Debug builds log and use `fallback`; release builds return `error`.
    fn tolerate<T>(&self, fallback: T, error: SessionConfigError) -> Result<T, SessionConfigError> {
        if self.mode.is_debug() {
            warn!(%error, "using default session setting");
            Ok(fallback)
        } else {
            Err(error)
        }
    }

    fn flag(&self, var: &'static str, default: bool) -> Result<bool, SessionConfigError> {
        let Some(value) = self.env.string(var) else {
            return self.tolerate(default, SessionConfigError::Missing { var });
        };
        match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => self.tolerate(
                default,
                SessionConfigError::Invalid {
                    var,
                    value,
                    expected: BOOL_EXPECTED,
                },
            ),
        }
    }

    fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let default = if self.mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        };
        let Some(value) = self.env.string(SAMESITE_ENV) else {
            return self.tolerate(default, SessionConfigError::Missing { var: SAMESITE_ENV });
        };
        match value.to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" if cookie_secure => Ok(SameSite::None),
            // Browsers may drop the cookie, but local HTTP development still works.
            "none" => self.tolerate(SameSite::None, SessionConfigError::SameSiteNoneRequiresSecure),
            _ => self.tolerate(
                default,
                SessionConfigError::Invalid {
                    var: SAMESITE_ENV,
                    value,
                    expected: SAMESITE_EXPECTED,
                },
            ),
        }
    }
}

fn load_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => Zeroizing::new(bytes),
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using temporary session key (dev only)");
            return Ok(Key::generate());
        }
        Err(source) => {
            return Err(SessionConfigError::KeyUnreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let min_len = if mode.is_debug() {
        KEY_DERIVE_MIN_LEN
    } else {
        SESSION_KEY_MIN_LEN
    };
    if bytes.len() < min_len {
        return Err(SessionConfigError::KeyTooShort {
            path: path.to_path_buf(),
            len: bytes.len(),
            min_len,
        });
    }
    let key = Key::derive_from(&bytes);
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");
    Ok(key)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
