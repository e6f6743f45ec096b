pub mod client;
pub mod request;
pub mod response;

pub use client::{ProbeClient, ProbePolicy, DEFAULT_USER_AGENT};
pub use request::HttpRequest;
pub use response::HttpResponse;
