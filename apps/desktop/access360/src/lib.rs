// Library exports for testing
// The binary (main.rs) imports these as well

pub mod commands;
pub mod error;
pub mod logger;
pub mod notifications;
pub mod state;

#[cfg(test)]
mod tests;
