// Utility functions

pub mod logger;
pub mod report;
pub mod retry;

pub use logger::*;
pub use report::*;
pub use retry::*;
