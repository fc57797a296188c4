//! Report-update coordination service.
//!
//! This crate provides:
//! - The wire envelope with correlation-id threading
//! - Two-field request body parsing and report JSON decoding
//! - The update coordinator: locate → replace → cancel → validate →
//!   compute-delay → stamp → arm
//! - Per-caller sessions processing requests sequentially over a channel
//!   transport seam

pub mod coordinator;
pub mod message;
pub mod parser;
pub mod session;
pub mod traits;

pub use coordinator::{Ack, UpdateCoordinator};
pub use message::{topics, Envelope};
pub use session::Session;
pub use traits::RequestHandler;
