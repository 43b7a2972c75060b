pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod time;

pub use error::{Result, TelemeterError};
