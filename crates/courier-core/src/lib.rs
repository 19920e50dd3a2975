pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod types;
pub mod validation;

pub use config::CourierConfig;
pub use error::{CourierError, RegistryError, Result, ValidationError};
pub use registry::{OperationRegistry, RegistryBuilder};
pub use types::*;
