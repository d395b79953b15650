pub mod active;
pub mod current;
pub mod history;
pub mod record_event;
