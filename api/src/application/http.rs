pub mod evidence;
pub mod health;
pub mod label_analysis;
pub mod server;
