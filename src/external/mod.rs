//! External collaborator interfaces.
//!
//! The engine never talks to a database, ledger, or audit log directly;
//! it consumes these abstract contracts. Deployments back them with the
//! organization's stores; tests back them with in-memory fakes.

mod lock;
mod lookups;
mod sinks;

pub use lock::{ClusterLock, LocalClusterLock, LockLease};
pub use lookups::{AttendanceLookup, ContractLookup, LeaveLookup, SalesLookup};
pub use sinks::{AuditSink, TransactionDirection, TransactionSink};
