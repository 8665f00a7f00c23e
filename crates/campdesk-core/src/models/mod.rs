//! Data models for camp agenda entities.
//!
//! - `AgendaDay`, `AgendaItem`: the per-day session schedule
//! - `SessionType`, `SessionStatus`: session classification
//! - `SessionDraft`: add/edit form state, also the POST body
//! - `SessionUpdate`: PUT body, with cleared fields sent as `null`
//! - `StaffMember`, `Clinician`, `Location`: reference data
//! - `Camp`: camp metadata and date range

pub mod agenda;
pub mod camp;
pub mod envelope;
pub mod reference;

pub use agenda::{
    AgendaDay, AgendaDayPayload, AgendaItem, AgendaPayload, SessionDraft, SessionStatus,
    SessionType, SessionUpdate, WALL_TIME_FORMAT,
};
pub use camp::Camp;
pub use envelope::Envelope;
pub use reference::{Clinician, Location, ReferenceData, StaffMember};
