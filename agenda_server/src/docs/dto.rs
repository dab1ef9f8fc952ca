use crate::{appointments, directory, error::ErrorServer, info};
use agenda_core::appointments::{
    Appointment, AppointmentDetails, AppointmentKind, AppointmentProposal, Buyer, NewBuyer,
    NewVendor, Vendor,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        info::handler::info,
        appointments::handler::list_appointments,
        appointments::handler::get_appointment,
        appointments::handler::create_appointment,
        appointments::handler::update_appointment,
        appointments::handler::delete_appointment,
        directory::handler::list_vendors,
        directory::handler::register_vendor,
        directory::handler::list_buyers,
        directory::handler::register_buyer,
    ),
    components(schemas(
        info::dto::Info,
        appointments::dto::MessageResponse,
        Appointment,
        AppointmentDetails,
        AppointmentKind,
        AppointmentProposal,
        Vendor,
        Buyer,
        NewVendor,
        NewBuyer,
        ErrorServer,
    ))
)]
pub struct ApiDoc;
