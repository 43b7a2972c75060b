pub mod bucket;
pub mod differential;
pub mod normalize;
pub mod pipeline;
pub mod window;
