//! Data models shared by the engine and the dashboard.

pub mod models;
pub mod utils;
