pub mod kd_tree;
pub mod label_encoding;
pub mod peaks;
pub mod selection;
