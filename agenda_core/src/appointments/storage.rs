use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Serialize, de::DeserializeOwned};
use sled::{Db, Transactional, Tree, transaction::TransactionResult};

use super::dto::{
    Appointment, AppointmentDetails, AppointmentId, AppointmentProposal, Buyer, BuyerId,
    NewBuyer, NewVendor, PartyRole, Vendor, VendorId,
};
use super::error::StoreError;

const APPOINTMENTS_TREE: &str = "appointments";
const APPOINTMENTS_BY_HOST_TREE: &str = "appointments_by_host";
const APPOINTMENTS_BY_CLIENT_TREE: &str = "appointments_by_client";
const VENDORS_TREE: &str = "vendors";
const BUYERS_TREE: &str = "buyers";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for appointments. Each call observes the latest committed
/// state at call time and nothing stronger.
pub trait AppointmentStore {
    fn find_by_id(&self, id: AppointmentId) -> StoreResult<Option<Appointment>>;

    /// All appointments with host and client resolved.
    fn find_all(&self) -> StoreResult<Vec<AppointmentDetails>>;

    /// First appointment of `party_id` in `role` overlapping `[start, end)`,
    /// skipping `exclude_id`.
    fn find_overlapping(
        &self,
        role: PartyRole,
        party_id: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<AppointmentId>,
    ) -> StoreResult<Option<Appointment>>;

    /// Persists a new appointment under a freshly assigned identity.
    fn insert(&self, proposal: AppointmentProposal) -> StoreResult<Appointment>;

    fn update(&self, appointment: Appointment) -> StoreResult<Appointment>;

    fn remove(&self, appointment: &Appointment) -> StoreResult<()>;
}

/// Vendors and buyers. Their lifecycle is independent of appointments.
pub trait Directory {
    fn find_vendor(&self, id: VendorId) -> StoreResult<Option<Vendor>>;
    fn find_buyer(&self, id: BuyerId) -> StoreResult<Option<Buyer>>;
    fn vendors(&self) -> StoreResult<Vec<Vendor>>;
    fn buyers(&self) -> StoreResult<Vec<Buyer>>;
    fn insert_vendor(&self, vendor: NewVendor) -> StoreResult<Vendor>;
    fn insert_buyer(&self, buyer: NewBuyer) -> StoreResult<Buyer>;
}

/// sled-backed store. Appointments are indexed per host and per client
/// under `party_id ++ appointment_id` (both big-endian) so that overlap
/// lookups only scan one party's appointments.
#[derive(Clone)]
pub struct SledStore {
    db: Db,
    appointments: Tree,
    by_host: Tree,
    by_client: Tree,
    vendors: Tree,
    buyers: Tree,
}

impl SledStore {
    pub fn new(db: Db) -> sled::Result<Self> {
        let appointments = db.open_tree(APPOINTMENTS_TREE)?;
        let by_host = db.open_tree(APPOINTMENTS_BY_HOST_TREE)?;
        let by_client = db.open_tree(APPOINTMENTS_BY_CLIENT_TREE)?;
        let vendors = db.open_tree(VENDORS_TREE)?;
        let buyers = db.open_tree(BUYERS_TREE)?;

        Ok(Self {
            db,
            appointments,
            by_host,
            by_client,
            vendors,
            buyers,
        })
    }

    fn next_id(&self) -> StoreResult<u64> {
        // generate_id starts at zero
        Ok(self.db.generate_id()? + 1)
    }

    fn index(&self, role: PartyRole) -> &Tree {
        match role {
            PartyRole::Host => &self.by_host,
            PartyRole::Client => &self.by_client,
        }
    }

    fn index_key(party_id: u64, appointment_id: AppointmentId) -> Vec<u8> {
        let mut key = Vec::with_capacity(16);
        key.extend_from_slice(&party_id.to_be_bytes());
        key.extend_from_slice(&appointment_id.to_be_bytes());
        key
    }

    fn appointment_id_from_index(key: &[u8]) -> Option<AppointmentId> {
        let bytes: [u8; 8] = key.get(8..16)?.try_into().ok()?;
        Some(AppointmentId::from_be_bytes(bytes))
    }

    fn get_record<T: DeserializeOwned>(tree: &Tree, id: u64) -> StoreResult<Option<T>> {
        match tree.get(id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_record<T: Serialize>(tree: &Tree, id: u64, record: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec(record)?;
        tree.insert(id.to_be_bytes(), bytes)?;
        Ok(())
    }

    fn all_records<T: DeserializeOwned>(tree: &Tree) -> StoreResult<Vec<T>> {
        let mut out = Vec::new();
        for entry in tree.iter() {
            let (_key, bytes) = entry?;
            out.push(serde_json::from_slice(&bytes)?);
        }
        Ok(out)
    }

    fn write_appointment(
        &self,
        appointment: &Appointment,
        previous: Option<&Appointment>,
    ) -> StoreResult<()> {
        let key = appointment.id.to_be_bytes();
        let value = serde_json::to_vec(appointment)?;
        let host_key = Self::index_key(appointment.host_id, appointment.id);
        let client_key = Self::index_key(appointment.client_id, appointment.id);
        let stale_keys = previous.map(|previous| {
            (
                Self::index_key(previous.host_id, previous.id),
                Self::index_key(previous.client_id, previous.id),
            )
        });

        let result: TransactionResult<()> = (&self.appointments, &self.by_host, &self.by_client)
            .transaction(|(appointments, by_host, by_client)| {
                if let Some((stale_host, stale_client)) = &stale_keys {
                    by_host.remove(stale_host.as_slice())?;
                    by_client.remove(stale_client.as_slice())?;
                }
                appointments.insert(&key[..], value.clone())?;
                by_host.insert(host_key.as_slice(), Vec::new())?;
                by_client.insert(client_key.as_slice(), Vec::new())?;
                Ok(())
            });
        result?;

        Ok(())
    }
}

impl AppointmentStore for SledStore {
    fn find_by_id(&self, id: AppointmentId) -> StoreResult<Option<Appointment>> {
        Self::get_record(&self.appointments, id)
    }

    fn find_all(&self) -> StoreResult<Vec<AppointmentDetails>> {
        let appointments: Vec<Appointment> = Self::all_records(&self.appointments)?;
        let mut out = Vec::with_capacity(appointments.len());

        for appointment in appointments {
            let host = self.find_vendor(appointment.host_id)?;
            let client = self.find_buyer(appointment.client_id)?;
            out.push(AppointmentDetails::from((appointment, host, client)));
        }

        Ok(out)
    }

    fn find_overlapping(
        &self,
        role: PartyRole,
        party_id: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<AppointmentId>,
    ) -> StoreResult<Option<Appointment>> {
        for entry in self.index(role).scan_prefix(party_id.to_be_bytes()) {
            let (key, _) = entry?;

            let Some(id) = Self::appointment_id_from_index(&key) else {
                warn!("Skipping malformed {} index entry: {:?}", role, key);
                continue;
            };

            if exclude_id == Some(id) {
                continue;
            }

            let Some(existing) = self.find_by_id(id)? else {
                warn!("{} index points at missing appointment {}", role, id);
                continue;
            };

            if existing.party(role) == party_id && existing.overlaps(start, end) {
                debug!(
                    "Appointment {} overlaps [{}, {}) for {} {}",
                    existing.id, start, end, role, party_id
                );
                return Ok(Some(existing));
            }
        }

        Ok(None)
    }

    fn insert(&self, proposal: AppointmentProposal) -> StoreResult<Appointment> {
        let appointment = proposal.into_appointment(self.next_id()?);
        self.write_appointment(&appointment, None)?;
        Ok(appointment)
    }

    fn update(&self, appointment: Appointment) -> StoreResult<Appointment> {
        let previous = self.find_by_id(appointment.id)?;
        self.write_appointment(&appointment, previous.as_ref())?;
        Ok(appointment)
    }

    fn remove(&self, appointment: &Appointment) -> StoreResult<()> {
        let key = appointment.id.to_be_bytes();
        let host_key = Self::index_key(appointment.host_id, appointment.id);
        let client_key = Self::index_key(appointment.client_id, appointment.id);

        let result: TransactionResult<()> = (&self.appointments, &self.by_host, &self.by_client)
            .transaction(|(appointments, by_host, by_client)| {
                appointments.remove(&key[..])?;
                by_host.remove(host_key.as_slice())?;
                by_client.remove(client_key.as_slice())?;
                Ok(())
            });
        result?;

        Ok(())
    }
}

impl Directory for SledStore {
    fn find_vendor(&self, id: VendorId) -> StoreResult<Option<Vendor>> {
        Self::get_record(&self.vendors, id)
    }

    fn find_buyer(&self, id: BuyerId) -> StoreResult<Option<Buyer>> {
        Self::get_record(&self.buyers, id)
    }

    fn vendors(&self) -> StoreResult<Vec<Vendor>> {
        Self::all_records(&self.vendors)
    }

    fn buyers(&self) -> StoreResult<Vec<Buyer>> {
        Self::all_records(&self.buyers)
    }

    fn insert_vendor(&self, vendor: NewVendor) -> StoreResult<Vendor> {
        let vendor = Vendor {
            id: self.next_id()?,
            name: vendor.name,
        };
        Self::put_record(&self.vendors, vendor.id, &vendor)?;
        Ok(vendor)
    }

    fn insert_buyer(&self, buyer: NewBuyer) -> StoreResult<Buyer> {
        let buyer = Buyer {
            id: self.next_id()?,
            name: buyer.name,
            company_name: buyer.company_name,
        };
        Self::put_record(&self.buyers, buyer.id, &buyer)?;
        Ok(buyer)
    }
}
