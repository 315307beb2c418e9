//! Configuration loading and validation.
mod loader;
pub mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use loader::load_config;
pub use validate::{Suite, build_suite};

#[cfg(test)]
pub(crate) use loader::load_config_file;
