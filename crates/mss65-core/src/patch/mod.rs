//! Patch descriptors and the bounds-checked applier.
//!
//! - **Descriptor**: hex payload plus an address rule
//! - **Applier**: resolves the address and overwrites the image in place
//! - **Library**: immutable name to descriptor map loaded from JSON
//! - **Report**: record of every write made during a run

mod applier;
mod descriptor;
mod hex;
mod library;
mod report;

pub use applier::*;
pub use descriptor::*;
pub use hex::*;
pub use library::*;
pub use report::*;
