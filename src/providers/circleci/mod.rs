mod client;
mod provider;
mod tests;
mod types;

pub use provider::CircleCiProvider;
pub use types::{Project, ProjectRef, Variable};

#[cfg(test)]
pub use types::Build;
