pub mod navigation;
pub mod role;
