//! Domain reconciliation

pub mod hostname;
pub mod reconciler;
pub mod tunnel;

pub use reconciler::{DomainReconciler, ReconcilerSettings, SyncReport};
