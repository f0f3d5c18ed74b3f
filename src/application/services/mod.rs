//! Application services

pub mod structure;

pub use structure::StructureService;
