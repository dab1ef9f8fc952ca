use std::fmt;

use sled::transaction::TransactionError;
use thiserror::Error;

use super::dto::{AppointmentId, BuyerId, ConflictReport, PartyRole, VendorId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("record codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("transaction aborted")]
    Transaction,
}

impl From<TransactionError<()>> for StoreError {
    fn from(error: TransactionError<()>) -> Self {
        match error {
            TransactionError::Abort(()) => StoreError::Transaction,
            TransactionError::Storage(e) => StoreError::Sled(e),
        }
    }
}

/// Parties named by a failed conflict check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub host: Option<VendorId>,
    pub client: Option<BuyerId>,
}

impl Conflict {
    pub fn from_report(report: ConflictReport, host_id: VendorId, client_id: BuyerId) -> Self {
        Conflict {
            host: report.host_conflict.then_some(host_id),
            client: report.client_conflict.then_some(client_id),
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.host, self.client) {
            (Some(host), Some(client)) => write!(
                f,
                "Conflicting appointments found with both the host and the client (Host ID: {}, Client ID: {})",
                host, client
            ),
            (Some(host), None) => write!(
                f,
                "Conflicting appointments found with the host (Host ID: {})",
                host
            ),
            (None, Some(client)) => write!(
                f,
                "Conflicting appointments found with the client (Client ID: {})",
                client
            ),
            (None, None) => write!(f, "No conflicting appointments"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("Appointment startTime cannot be in the past")]
    PastStartTime,
    #[error("Appointment endTime cannot be smaller than or equal to startTime")]
    InvalidRange,
    #[error("{0}")]
    InvalidProposal(String),
    #[error("Unknown {role} (ID: {id})")]
    UnknownParty { role: PartyRole, id: u64 },
    #[error("{0}")]
    SchedulingConflict(Conflict),
    #[error("Appointment not found")]
    NotFound(AppointmentId),
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
