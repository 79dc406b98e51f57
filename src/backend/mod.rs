// Concrete backend implementations

pub mod http;

pub use http::{HttpBackend, HttpConnection};
