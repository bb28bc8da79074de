//! Benefits enrollment service library.
//!
//! Employees browse a catalog of benefits and submit enrollment requests;
//! HR staff approve or deny them. PostgreSQL is the sole owner of state:
//! every request is an independent SQL operation, and the server keeps no
//! in-memory records across requests.

pub mod config;
pub mod enrollment;
pub mod error;
pub mod telemetry;
