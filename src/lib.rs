//! OSMOS – reflected parameter and unfiltered character probe
//!
//! Given a URL, finds the query parameters whose values come back in the
//! page, confirms them with a marker, and checks which special characters
//! survive unfiltered. See [`xss::Pipeline`] for the entry point.

pub mod cli;
pub mod core;
pub mod errors;
pub mod http;
pub mod payload;
pub mod reporting;
pub mod xss;

pub use errors::ProbeError;
pub use http::{ProbeClient, ProbePolicy};
pub use reporting::Finding;
pub use xss::{check_append, detect_reflected, ParamCheck, Pipeline, PipelineConfig};
