pub mod common;
pub mod evidence;
pub mod explanation;
pub mod label;
pub mod pipeline;
