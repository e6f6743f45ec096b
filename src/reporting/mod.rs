pub mod json;
pub mod model;
pub mod reporter;
pub mod text;

pub use model::Finding;
pub use reporter::Reporter;
