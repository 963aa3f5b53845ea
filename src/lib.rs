pub mod config;
pub mod error;
pub mod export;
pub mod lookup;
pub mod province;
pub mod tables;
pub mod trace;

pub use config::{DataPaths, ExportParams, TraceSettings};
pub use error::{MapError, Result};
pub use export::{RunSummary, run};
