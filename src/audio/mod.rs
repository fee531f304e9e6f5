pub mod decoder;
pub mod pitch;
