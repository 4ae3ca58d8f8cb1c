// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Instance names, image fingerprints, instance kinds, and operation handles.

mod fingerprint;
mod id;
mod instance_kind;
mod instance_name;

pub use fingerprint::{Fingerprint, FingerprintError};
pub use id::{Id, OperationId};
pub use instance_kind::{InstanceKind, ParseInstanceKindError};
pub use instance_name::{InstanceName, InstanceNameError};
