pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod session;
pub mod sync;
pub mod terminal;
