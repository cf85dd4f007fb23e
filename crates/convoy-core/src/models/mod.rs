//! Data models for Convoy

mod activity;
mod charge;
mod client;
mod driver;
mod member;
mod quote;
mod record;
mod tour;
mod trailer;
mod trip;
mod vehicle;

pub use activity::{ActivityAction, ActivityEvent};
pub use charge::{Charge, ChargePatch, NewCharge, Periodicity};
pub use client::{Client, ClientPatch, NewClient};
pub use driver::{Driver, DriverPatch, NewDriver};
pub use member::{Role, TeamMember};
pub use quote::{NewQuote, Quote, QuotePatch, QuoteStatus};
pub use record::{
    RecordDraft, RecordId, RecordKind, RecordPatch, SyncRecord, UserId, WorkspaceId,
};
pub use tour::{NewTour, Tour, TourPatch};
pub use trailer::{NewTrailer, Trailer, TrailerPatch};
pub use trip::{NewTrip, Trip, TripPatch};
pub use vehicle::{NewVehicle, Vehicle, VehiclePatch};
