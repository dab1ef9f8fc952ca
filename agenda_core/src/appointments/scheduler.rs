use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use log::{info, warn};

use super::dto::{
    Appointment, AppointmentDetails, AppointmentId, AppointmentKind, AppointmentProposal, Buyer,
    BuyerId, ConflictReport, NewBuyer, NewVendor, PartyRole, Vendor, VendorId,
};
use super::error::{Conflict, SchedulingError, SchedulingResult};
use super::storage::{AppointmentStore, Directory};

/// Rejects start times at or before `now` and empty or inverted ranges.
pub fn validate_times(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> SchedulingResult<()> {
    if start <= now {
        return Err(SchedulingError::PastStartTime);
    }

    if end <= start {
        return Err(SchedulingError::InvalidRange);
    }

    Ok(())
}

pub fn validate_proposal(proposal: &AppointmentProposal) -> SchedulingResult<()> {
    if proposal.title.trim().is_empty() {
        return Err(SchedulingError::InvalidProposal(
            "Appointment title cannot be empty".to_string(),
        ));
    }

    if proposal.kind == AppointmentKind::Physical && proposal.location.trim().is_empty() {
        return Err(SchedulingError::InvalidProposal(
            "Physical appointments require a location".to_string(),
        ));
    }

    Ok(())
}

pub fn ensure_parties<D: Directory + ?Sized>(
    directory: &D,
    host_id: VendorId,
    client_id: BuyerId,
) -> SchedulingResult<()> {
    if directory.find_vendor(host_id)?.is_none() {
        return Err(SchedulingError::UnknownParty {
            role: PartyRole::Host,
            id: host_id,
        });
    }

    if directory.find_buyer(client_id)?.is_none() {
        return Err(SchedulingError::UnknownParty {
            role: PartyRole::Client,
            id: client_id,
        });
    }

    Ok(())
}

/// Checks host and client independently; each side stops at its first
/// overlapping appointment.
pub fn find_conflicts<S: AppointmentStore + ?Sized>(
    store: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    host_id: VendorId,
    client_id: BuyerId,
    exclude_id: Option<AppointmentId>,
) -> SchedulingResult<ConflictReport> {
    let host_conflict = store
        .find_overlapping(PartyRole::Host, host_id, start, end, exclude_id)?
        .is_some();
    let client_conflict = store
        .find_overlapping(PartyRole::Client, client_id, start, end, exclude_id)?
        .is_some();

    Ok(ConflictReport {
        host_conflict,
        client_conflict,
    })
}

fn check_proposal<S: AppointmentStore + Directory + ?Sized>(
    store: &S,
    proposal: &AppointmentProposal,
    exclude_id: Option<AppointmentId>,
    now: DateTime<Utc>,
) -> SchedulingResult<()> {
    validate_times(proposal.start_time, proposal.end_time, now)?;
    validate_proposal(proposal)?;
    ensure_parties(store, proposal.host_id, proposal.client_id)?;

    let report = find_conflicts(
        store,
        proposal.start_time,
        proposal.end_time,
        proposal.host_id,
        proposal.client_id,
        exclude_id,
    )?;

    if report.any() {
        let conflict = Conflict::from_report(report, proposal.host_id, proposal.client_id);
        warn!("Rejected proposal \"{}\": {}", proposal.title, conflict);
        return Err(SchedulingError::SchedulingConflict(conflict));
    }

    Ok(())
}

pub fn create_appointment<S: AppointmentStore + Directory + ?Sized>(
    store: &S,
    proposal: AppointmentProposal,
    now: DateTime<Utc>,
) -> SchedulingResult<Appointment> {
    check_proposal(store, &proposal, None, now)?;

    let appointment = store.insert(proposal)?;

    info!(
        "Created appointment {} for host {} and client {}",
        appointment.id, appointment.host_id, appointment.client_id
    );

    Ok(appointment)
}

/// Always re-validates, even when only non-temporal fields change.
pub fn update_appointment<S: AppointmentStore + Directory + ?Sized>(
    store: &S,
    id: AppointmentId,
    proposal: AppointmentProposal,
    now: DateTime<Utc>,
) -> SchedulingResult<Appointment> {
    let existing = store
        .find_by_id(id)?
        .ok_or(SchedulingError::NotFound(id))?;

    check_proposal(store, &proposal, Some(existing.id), now)?;

    let appointment = store.update(proposal.into_appointment(existing.id))?;

    info!("Updated appointment {}", appointment.id);

    Ok(appointment)
}

pub fn delete_appointment<S: AppointmentStore + ?Sized>(
    store: &S,
    id: AppointmentId,
) -> SchedulingResult<Appointment> {
    let existing = store
        .find_by_id(id)?
        .ok_or(SchedulingError::NotFound(id))?;

    store.remove(&existing)?;

    info!("Deleted appointment {}", id);

    Ok(existing)
}

/// Owns the store and serializes every check-then-write sequence so that no
/// two committed appointments of the same party overlap.
pub struct Scheduler<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S> From<S> for Scheduler<S> {
    fn from(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }
}

impl<S: AppointmentStore + Directory> Scheduler<S> {
    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // guards no data
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(
        &self,
        proposal: AppointmentProposal,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Appointment> {
        let _guard = self.lock();
        create_appointment(&self.store, proposal, now)
    }

    pub fn update(
        &self,
        id: AppointmentId,
        proposal: AppointmentProposal,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Appointment> {
        let _guard = self.lock();
        update_appointment(&self.store, id, proposal, now)
    }

    pub fn delete(&self, id: AppointmentId) -> SchedulingResult<Appointment> {
        let _guard = self.lock();
        delete_appointment(&self.store, id)
    }

    pub fn list_appointments(&self) -> SchedulingResult<Vec<AppointmentDetails>> {
        Ok(self.store.find_all()?)
    }

    pub fn get_appointment(&self, id: AppointmentId) -> SchedulingResult<AppointmentDetails> {
        let appointment = self
            .store
            .find_by_id(id)?
            .ok_or(SchedulingError::NotFound(id))?;
        let host = self.store.find_vendor(appointment.host_id)?;
        let client = self.store.find_buyer(appointment.client_id)?;

        Ok(AppointmentDetails::from((appointment, host, client)))
    }

    pub fn list_vendors(&self) -> SchedulingResult<Vec<Vendor>> {
        Ok(self.store.vendors()?)
    }

    pub fn list_buyers(&self) -> SchedulingResult<Vec<Buyer>> {
        Ok(self.store.buyers()?)
    }

    pub fn register_vendor(&self, vendor: NewVendor) -> SchedulingResult<Vendor> {
        if vendor.name.trim().is_empty() {
            return Err(SchedulingError::InvalidProposal(
                "Vendor name cannot be empty".to_string(),
            ));
        }

        let vendor = self.store.insert_vendor(vendor)?;
        info!("Registered vendor {} ({})", vendor.id, vendor.name);
        Ok(vendor)
    }

    pub fn register_buyer(&self, buyer: NewBuyer) -> SchedulingResult<Buyer> {
        if buyer.name.trim().is_empty() {
            return Err(SchedulingError::InvalidProposal(
                "Buyer name cannot be empty".to_string(),
            ));
        }

        let buyer = self.store.insert_buyer(buyer)?;
        info!("Registered buyer {} ({})", buyer.id, buyer.name);
        Ok(buyer)
    }
}
