//! Inbound adapters translating external requests into domain service calls.
//!
//! HTTP handlers live under [`http`]; framework types stay inside it.

pub mod http;
