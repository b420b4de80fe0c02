//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, authorization and repository calls into
//!   use-case level APIs.
//! - Keep presentation collaborators decoupled from storage details.

pub mod analytics;
pub mod export;
pub mod records_service;
