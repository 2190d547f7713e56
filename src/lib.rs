//! config-cache: merge application configuration into a single cached artifact
//!
//! Configuration units are discovered in an application directory and a
//! framework defaults directory, merged with application values taking
//! precedence, and written to one JSON artifact that is verified by loading
//! it back before it is kept.

pub mod bootstrap;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod host;
pub mod merge;
pub mod scan;
