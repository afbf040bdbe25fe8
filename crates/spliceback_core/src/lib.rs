pub mod batch;
mod error;
mod repair;
mod types;

pub use batch::{discover_candidates, BatchRunner, BatchSummary, RepairObserver};
pub use error::{RepairError, Result};
pub use repair::RepairRequest;
pub use types::ContainerFormat;
