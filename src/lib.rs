pub mod parser;
pub mod report;
pub mod utils;

// Re-export common items
pub use parser::parse_xml_files;
pub use report::update_data_file;
