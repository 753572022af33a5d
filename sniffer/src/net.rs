pub mod interface;
pub mod link;
