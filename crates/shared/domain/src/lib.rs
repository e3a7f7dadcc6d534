//! # Domain Models
//!
//! Pure domain types shared by every `BizHub` crate, with minimal dependencies (`serde`, `strum`).
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod identity;
pub mod registry;
pub mod submodule;
