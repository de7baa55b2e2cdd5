pub mod ai;
pub mod auth;
pub mod client;
pub mod database;
pub mod repositories;
