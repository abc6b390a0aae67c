//! OTI Core
//!
//! Core types and pure logic for the transit-indicators job monitor.
//!
//! This crate contains:
//! - Domain types: jobs, their calculation grid, and scenarios
//! - DTOs: request and error bodies of the indicators API
//! - Status aggregation and view-model assembly
//! - Display labels and scenario list helpers

pub mod domain;
pub mod dto;
pub mod labels;
pub mod scenarios;
pub mod status;
pub mod view;
