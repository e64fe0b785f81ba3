pub mod capability;
pub mod config;
pub mod error;
pub mod state;
pub mod types;

pub use capability::{CapabilityDescriptor, CapabilityRegistry};
pub use config::AppConfig;
pub use error::{FiresightError, Result};
pub use state::{StateRecord, StateUpdate};
pub use types::ExecutionId;
