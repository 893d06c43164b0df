pub mod analyze_label;
pub mod analyze_label_stream;
pub mod analyze_label_text;
