//! # device-catalog-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** that storage adapters must implement:
//!   - `DeviceRepository` — typed CRUD over the device tables, optimistic
//!     concurrency and identifier generation
//! - Define the **driving/inbound** use-case struct:
//!   - `DeviceService` — validate, assign identifiers, persist
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `device-catalog-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
