pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod models;
pub mod utils;
pub mod validation;

pub use error::{Error, Result};
