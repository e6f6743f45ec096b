// OSMOS XSS reconnaissance
// Reflection discovery, marker confirmation and special character survival

pub mod append;
pub mod check;
pub mod pipeline;
pub mod reflect;
pub mod stages;

pub use append::check_append;
pub use check::ParamCheck;
pub use pipeline::{spawn_pool, FilteredPolicy, Findings, Pipeline, PipelineConfig};
pub use reflect::{detect_reflected, reflected_params};
pub use stages::{CharacterSurvival, InitialReflection, MarkerConfirmation, Stage};
