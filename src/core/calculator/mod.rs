pub mod distance;
pub mod sessions;
