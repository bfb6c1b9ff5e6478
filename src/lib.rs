//! HTTP sentiment prediction over a pre-fitted TF-IDF vectorizer and classifier.

pub mod artifacts;
pub mod error;
pub mod input;
pub mod io_struct;
pub mod sentiment;
pub mod server;
pub mod state;

pub use error::PredictError;
pub use state::{ServiceConfig, ServiceState};
