pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{Document, FetchTransport, HttpClientTransport};
pub use config::toml_config::ClientConfig;
pub use crate::core::{
    binder::bind_data,
    client::ApiClient,
    envelope::{apidata, unwrap, Envelope},
    path::resolve,
};
pub use domain::model::{Method, RequestOptions, ResponseBody};
pub use domain::ports::Transport;
pub use utils::error::{ApiError, Result};
