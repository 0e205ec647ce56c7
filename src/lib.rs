pub mod core {
	pub mod engine;
	pub mod game;
}

pub mod cli;
pub mod quiz;

// Re-export for convenience
pub use crate::core::game::{Context, Game, HostCommand};
