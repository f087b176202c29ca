pub mod document;
pub mod mock;
pub mod relational;
