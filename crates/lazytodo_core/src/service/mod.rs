//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep terminal and CLI layers decoupled from storage details.

pub mod auth_service;
pub mod note_service;
