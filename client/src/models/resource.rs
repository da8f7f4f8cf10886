//! Resource limit models

use serde::{Deserialize, Serialize};

/// Bytes per mebibyte
pub const BYTES_PER_MIB: u64 = 1_048_576;

/// Declarative resource limit for one (stack, service) pair.
/// Takes effect when the owning service is next redeployed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimit {
    /// Owning stack ID
    pub stack_id: String,

    /// Service the limit applies to
    pub service_name: String,

    /// CPU limit in fractional cores
    pub cpu_limit: Option<f64>,

    /// Memory limit in bytes
    pub memory_limit: Option<u64>,
}

impl ResourceLimit {
    /// Memory limit expressed in MiB, as edited in the dashboard
    pub fn memory_limit_mib(&self) -> Option<u64> {
        self.memory_limit.map(bytes_to_mib)
    }
}

/// Convert a MiB value to bytes
pub fn mib_to_bytes(mib: u64) -> u64 {
    mib * BYTES_PER_MIB
}

/// Convert a byte value to whole MiB
pub fn bytes_to_mib(bytes: u64) -> u64 {
    bytes / BYTES_PER_MIB
}
