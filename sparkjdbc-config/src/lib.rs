// Loads the app configuration from yaml, interpolating ${...}
// expressions along the way

pub mod diagnostic;
pub mod loader;

mod ctx;
mod processor;

pub use loader::ConfigLoader;
