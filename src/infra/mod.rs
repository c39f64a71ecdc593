//! Infrastructure layer
//!
//! Handles all I/O operations: filesystem, external processes and the OS
//! package manager. This module is the only place where side effects occur.

pub mod filesystem;
pub mod packages;
pub mod process;
