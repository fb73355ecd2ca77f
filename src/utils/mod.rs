pub mod errors;
pub mod prompt;

pub use errors::AppError;
