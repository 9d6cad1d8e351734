// Adapters layer: concrete implementations for external systems (http backends, html documents).

pub mod dom;
pub mod http;

pub use dom::Document;
pub use http::{FetchTransport, HttpClientTransport};
