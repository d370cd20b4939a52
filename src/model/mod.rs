pub mod label;
pub mod numbering;
pub mod snapshot;
