//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title/day tabs/status bar, overlays
//! - `agenda`: timeline and list views of the selected day
//! - `dialogs`: session form, delete confirmation, copy-to-days picker
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod agenda;
pub mod dialogs;
pub mod input;
pub mod render;
pub mod styles;
