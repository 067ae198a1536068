pub mod hierarchy;
pub mod trends;
