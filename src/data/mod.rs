pub mod loader;
pub mod payload;
pub mod table;
