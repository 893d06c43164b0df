pub mod get_evidence;
