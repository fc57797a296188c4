pub mod config;
pub mod error;
pub mod recurrence;
pub mod report;
pub mod store;

pub use config::Config;
pub use error::*;
pub use recurrence::*;
pub use report::*;
pub use store::*;
