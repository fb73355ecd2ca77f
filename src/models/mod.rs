//! Data models shared between the services
//!
//! Each model is a plain data struct; the logic that produces or consumes
//! them lives in the service layer.

pub mod chart;
pub mod company;
pub mod quote;

// Re-export commonly used types for convenience
pub use chart::{BoxColor, BoxPlotSpec};
pub use company::CompanyDirectory;
pub use quote::DailyQuote;
