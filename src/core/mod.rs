//! Core driver logic
//!
//! Sequencing and decisions live here; external commands and file copies go
//! through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`distribution`] - Host distribution detection and family resolution
//! - [`installer`] - Build dependency installation
//! - [`builder`] - Configure/compile/package steps
//! - [`collect`] - Built package collection
//! - [`pipeline`] - The end-to-end run

pub mod builder;
pub mod collect;
pub mod distribution;
pub mod installer;
pub mod pipeline;
