pub mod binder;
pub mod client;
pub mod envelope;
pub mod path;

pub use crate::domain::model::{Method, RequestOptions, ResponseBody};
pub use crate::domain::ports::Transport;
pub use crate::utils::error::Result;
