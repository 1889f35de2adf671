pub mod date;
pub mod depth;
pub mod variables;
