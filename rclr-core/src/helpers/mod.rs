pub mod arena;
pub mod attrs;
pub mod reshape;
pub mod time;
