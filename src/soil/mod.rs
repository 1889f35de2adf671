pub mod assembler;
pub mod error;
pub mod hydraulic_params;
pub mod physics;
pub mod records;
