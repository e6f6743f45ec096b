pub mod context;
pub mod engine;

pub use context::Context;
pub use engine::Engine;
