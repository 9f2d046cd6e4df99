//! Loan underwriting: a fixed pipeline of independent evaluators (credit, employment,
//! collateral), a consistency check across their outputs, and a final decision synthesis,
//! plus the intake service and HTTP routes that sit in front of it.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
