//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login name, trimmed.
        username -> Varchar,
        /// Unique contact address, lower-cased.
        email -> Varchar,
        /// Encoded PBKDF2 hash.
        password_hash -> Text,
        /// One of `viewer`, `user`, `editor`, `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue of die-cast miniatures.
    miniatures (id) {
        id -> Int8,
        name -> Varchar,
        brand -> Varchar,
        scale -> Varchar,
        year -> Varchar,
        /// Creating user; null for rows imported without an author.
        created_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership ledger: one row per `(user, miniature)` pair.
    collection_entries (user_id, miniature_id) {
        user_id -> Uuid,
        miniature_id -> Int8,
        added_at -> Timestamptz,
    }
}

diesel::joinable!(collection_entries -> miniatures (miniature_id));
diesel::joinable!(collection_entries -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(collection_entries, miniatures, users);
