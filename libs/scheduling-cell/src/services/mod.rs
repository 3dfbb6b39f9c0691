pub mod lifecycle;
pub mod scheduler;
pub mod slots;
