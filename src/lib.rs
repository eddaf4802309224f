pub mod content;
pub mod db;
pub mod error;
pub mod forms;
pub mod http;
mod migrations;
pub mod scoring;
pub mod services;
pub mod state;
pub mod store;
pub mod types;
pub mod util;
