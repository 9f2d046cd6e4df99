pub mod applications;
pub mod underwriting;
