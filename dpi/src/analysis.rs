pub mod qos;
pub mod security;
pub mod summary;
