//! HTTP server configuration object.

use std::net::SocketAddr;

use minipedia::inbound::http::session_config::SessionSettings;
use minipedia::inbound::http::state::HttpState;

/// Everything [`create_server`](super::create_server) needs to listen.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Bundle validated session settings, the listen address and wired
    /// services.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            session,
            bind_addr,
            http_state,
        }
    }
}
