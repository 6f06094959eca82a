//! Session configuration loading

mod loader;

pub use loader::SessionConfigLoader;
