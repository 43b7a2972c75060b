pub mod adapter;
pub mod record;
