pub mod error;
pub mod problem;
pub mod types;

pub use error::VzError;
pub use problem::*;
pub use types::*;
