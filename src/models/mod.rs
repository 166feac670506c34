pub mod events;
pub mod job;
pub mod message;
