pub mod api;
pub mod collection;
pub mod config;
pub mod confirm;
pub mod detail;
pub mod error;
pub mod history;
pub mod platform;
pub mod protocol;
pub mod resolve;
pub mod view;
