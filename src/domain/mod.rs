//! Pure domain models (donations, NGOs, users).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod donation;
pub mod ngo;
pub mod user;

pub use common::*;
pub use donation::*;
pub use ngo::*;
pub use user::*;
