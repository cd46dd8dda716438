//! Orchestration and the HTTP surface

pub mod http;
pub mod pipeline;

pub use http::*;
pub use pipeline::*;
