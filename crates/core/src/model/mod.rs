pub mod aggregate;
pub mod point;
