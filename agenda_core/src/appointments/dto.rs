use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type AppointmentId = u64;
pub type VendorId = u64;
pub type BuyerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentKind {
    Virtual,
    Physical,
}

/// Which side of an appointment a party sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    Host,
    Client,
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyRole::Host => write!(f, "host"),
            PartyRole::Client => write!(f, "client"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub id: BuyerId,
    pub name: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewVendor {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBuyer {
    pub name: String,
    pub company_name: String,
}

/// Stored appointment. Host and client are held by identity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    pub location: String,
    pub host_id: VendorId,
    pub client_id: BuyerId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Appointment {
    pub fn party(&self, role: PartyRole) -> u64 {
        match role {
            PartyRole::Host => self.host_id,
            PartyRole::Client => self.client_id,
        }
    }

    /// Half-open overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }
}

/// Body of the create and update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentProposal {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    #[serde(default)]
    pub location: String,
    pub host_id: VendorId,
    pub client_id: BuyerId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl AppointmentProposal {
    /// Location survives only for physical appointments.
    pub fn normalized_location(&self) -> String {
        match self.kind {
            AppointmentKind::Physical => self.location.clone(),
            AppointmentKind::Virtual => String::new(),
        }
    }

    pub fn into_appointment(self, id: AppointmentId) -> Appointment {
        let location = self.normalized_location();

        Appointment {
            id,
            title: self.title,
            kind: self.kind,
            location,
            host_id: self.host_id,
            client_id: self.client_id,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Appointment with host and client resolved. A party that no longer exists
/// is reported as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    pub id: AppointmentId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub host: Option<Vendor>,
    pub client: Option<Buyer>,
}

impl From<(Appointment, Option<Vendor>, Option<Buyer>)> for AppointmentDetails {
    fn from((appointment, host, client): (Appointment, Option<Vendor>, Option<Buyer>)) -> Self {
        AppointmentDetails {
            id: appointment.id,
            title: appointment.title,
            kind: appointment.kind,
            location: appointment.location,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            host,
            client,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub host_conflict: bool,
    pub client_conflict: bool,
}

impl ConflictReport {
    pub fn any(&self) -> bool {
        self.host_conflict || self.client_conflict
    }

    pub fn is_empty(&self) -> bool {
        !self.any()
    }
}
