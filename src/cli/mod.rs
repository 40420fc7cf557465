//! CLI module for the strapi-migrate binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
