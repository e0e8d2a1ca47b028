pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub use config::Config;
pub use error::KindredError;
pub use types::*;
pub use validation::*;
