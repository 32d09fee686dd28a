//! Running the edited file
//!
//! `coordinator` owns the external process; `panel` turns its lifecycle
//! signals into console output and run-trigger state.

mod coordinator;
mod panel;

pub use coordinator::{RunCoordinator, RunEvent, RunRecord};
pub use panel::RunPanel;
