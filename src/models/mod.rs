//! Domain records owned by the storage layer. The analytics core only
//! reads these; corrections happen through storage, never through analytics.

pub mod enums;
mod dosage;
mod event;
mod medication;
mod patient;

pub use dosage::*;
pub use event::*;
pub use medication::*;
pub use patient::*;
