//! Data Transfer Objects for the indicators API
//!
//! Request and response bodies that are not themselves domain entities.

pub mod job;
