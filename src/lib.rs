//! Synthetic CRM record generator.
//!
//! A [`schema::Schema`] maps display labels to backend field names and
//! attaches a generator to every field. Rows are synthesized from an explicit
//! random source and written out as CSV by [`output::write_csv`].

#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod generators;
pub mod json;
pub mod logger;
pub mod output;
pub mod schema;

pub use error::Error;
