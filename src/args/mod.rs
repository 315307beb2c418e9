//! CLI argument types.
mod cli;

#[cfg(test)]
mod tests;

pub use cli::{
    BenchArgs, Command, ConfigFormat, InitArgs, ParseArgs, ParseFormat, RunArgs, ValidateArgs,
};
