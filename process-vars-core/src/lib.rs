//! Typed process-variable contracts.
//!
//! A process definition declares its variables through an extension document
//! (name, type, required flag, default). Before an instance is started the
//! caller's variables are checked and merged against that contract by
//! [`resolver::VariableContractResolver`]; [`runtime::ProcessRuntime`] wires
//! the resolver to an [`store::InstanceStore`].

pub mod error;
pub mod extensions;
pub mod request;
pub mod resolver;
pub mod runtime;
pub mod store;
pub mod store_memory;
pub mod types;

pub use error::{ExtensionError, RequestError, RuntimeError, ValidationError};
pub use extensions::{ExtensionRegistry, ProcessExtensions};
pub use request::{ProcessStartRequest, ProcessStartRequestBuilder};
pub use resolver::{ResolverConfig, VariableContractResolver};
pub use runtime::ProcessRuntime;
pub use store::InstanceStore;
pub use store_memory::MemoryStore;
pub use types::{
    ProcessInstance, ProcessInstanceStatus, Value, VariableContract, VariableDefinition,
    VariableType, VariableValue,
};
