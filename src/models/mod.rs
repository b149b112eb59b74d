pub mod classify_types;
pub mod flow_types;
