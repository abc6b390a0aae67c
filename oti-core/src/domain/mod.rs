//! Core domain types
//!
//! This module contains the structures exchanged with the transit-indicators
//! backend. They carry shape only; aggregation lives in [`crate::status`] and
//! [`crate::view`].

pub mod job;
pub mod scenario;
