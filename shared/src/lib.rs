pub mod error;
pub mod models;
pub mod validation;

pub use error::{ErrorDetail, Result, VoteError};
pub use models::*;
pub use validation::*;
