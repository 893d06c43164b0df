pub mod json_file;

pub use json_file::load_evidence_store;
