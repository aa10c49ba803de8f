//! Card requests and the builder that turns them into encoded images.

pub mod builder;
pub mod request;
