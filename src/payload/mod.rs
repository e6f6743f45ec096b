pub mod injector;
pub mod markers;

pub use injector::set_query_param;
pub use markers::{wrap_probe, MarkerSource, DEFAULT_MARKER, SPECIAL_CHARS};
