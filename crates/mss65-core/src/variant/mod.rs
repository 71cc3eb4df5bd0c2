//! Firmware variant detection.
//!
//! MSS65 dumps come in a small number of fixed layouts. Each layout shifts
//! the same logical calibration fields by a constant amount, recorded in an
//! [`OffsetTable`]. The variant is picked once per image from its exact
//! length and never changes for the rest of the run.

mod resolver;
mod table;

pub use resolver::*;
pub use table::*;
