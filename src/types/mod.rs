pub mod info;
pub mod link;
