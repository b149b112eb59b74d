pub mod adapters;
pub mod classifier;
pub mod flow_service;
pub mod scratch_service;
pub mod session;
