//! # device-catalog-domain
//!
//! Pure domain model for the device catalog.
//!
//! ## Responsibilities
//! - Foundational types: device identifiers, row-version tokens, error conventions
//! - Define **Devices** as a tagged union over the supported variants
//!   (personal computers, smartwatches, embedded network devices)
//! - Define the **validation rules** every device must satisfy before it is written
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod version;

pub mod device;
pub mod validation;
