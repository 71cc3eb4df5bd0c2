//! Tuning features and their composition into patch writes.

mod composer;
mod encoding;
pub mod layout;
mod request;

pub use composer::*;
pub use encoding::*;
pub use request::*;
