//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod collection;
pub mod error;
pub mod health;
pub mod miniatures;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// The caller supplies the scope, the session middleware and an
/// [`HttpState`](state::HttpState) in app data.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use minipedia::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(users::list_users)
        .service(users::change_role)
        .service(miniatures::list_miniatures)
        .service(miniatures::get_miniature)
        .service(miniatures::create_miniature)
        .service(miniatures::update_miniature)
        .service(miniatures::delete_miniature)
        .service(collection::list_collection)
        .service(collection::add_to_collection)
        .service(collection::remove_from_collection);
}
