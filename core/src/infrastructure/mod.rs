pub mod evidence;
pub mod llm;
