pub mod aggregatable;
pub mod parser;

pub use aggregatable::Aggregatable;
pub use parser::RecordParser;
