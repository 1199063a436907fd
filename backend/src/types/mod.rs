mod environment;
mod error;
mod settings;

pub use environment::Environment;
pub use error::{ApiErrorResponse, AppError};
pub use settings::{AwsCredentials, Settings};
