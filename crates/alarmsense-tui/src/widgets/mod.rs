//! Form widgets. Each keeps its state separate from drawing so the key
//! handling is testable without a terminal.

pub mod datetime_picker;
pub mod dropdown;
pub mod telemetry;
