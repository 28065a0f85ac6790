//! # Interchange
//!
//! Moves a financial model in and out of the process: the JSON model document
//! (import with validation, export with metadata), a flat CSV export, and the
//! sheet-structured statement layout used by spreadsheet exporters and the
//! terminal renderer.

pub mod csv;
pub mod document;
pub mod error;
pub mod workbook;

pub use document::{Metadata, ModelDocument, REQUIRED_FIELDS, export_json, import_json, import_json_str, write_json};
pub use crate::csv::export_csv;
pub use error::InterchangeError;
pub use workbook::{Cell, Sheet, SheetKind, Workbook};
