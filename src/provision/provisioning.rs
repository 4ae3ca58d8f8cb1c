// ABOUTME: Provisioning attempt parameterized by state marker.
// ABOUTME: Owns the instance specification for the lifetime of one attempt.

use super::spec::InstanceSpec;
use super::state::Created;

/// One provisioning attempt in state `S`.
///
/// Transitions consume the value, so a stage can never be revisited.
#[derive(Debug)]
pub struct Provisioning<S> {
    pub(crate) spec: InstanceSpec,
    pub(crate) state: S,
}

impl Provisioning<Created> {
    pub fn new(spec: InstanceSpec) -> Self {
        Provisioning {
            spec,
            state: Created,
        }
    }
}
