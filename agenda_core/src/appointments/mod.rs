pub mod dto;
pub mod error;
pub mod scheduler;
pub mod storage;

pub use dto::{
    Appointment, AppointmentDetails, AppointmentId, AppointmentKind, AppointmentProposal, Buyer,
    BuyerId, ConflictReport, NewBuyer, NewVendor, PartyRole, Vendor, VendorId,
};
pub use error::{Conflict, SchedulingError, SchedulingResult, StoreError};
pub use scheduler::Scheduler;
pub use storage::{AppointmentStore, Directory, SledStore};
