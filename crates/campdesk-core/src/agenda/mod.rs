//! Agenda editing: validation, filtering, views, copy and export.
//!
//! `SessionGateway` is the only path that mutates server state. Everything
//! else here is pure client-side state over the loaded `AgendaDay`s.

pub mod copy;
pub mod export;
pub mod filter;
pub mod gateway;
pub mod staff;
pub mod store;
pub mod validator;
pub mod view;

pub use copy::{CopyOutcome, CopySelection};
pub use export::{build_agenda_csv, export_file_name, AgendaExport, ExportError, ExportOutcome};
pub use filter::{filter_sessions, SessionFilter, TypeFilter};
pub use gateway::{ConfirmedDelete, DeleteConfirmation, SessionGateway};
pub use staff::StaffSelection;
pub use store::{fetch_agenda_days, fetch_camp, fetch_references, AgendaState, SessionStore};
pub use validator::{validate_session, ValidationError};
pub use view::{project, timeline_bar, SessionRow, ViewMode};
