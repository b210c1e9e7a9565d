pub mod delete;
pub mod import;
pub mod list;
pub mod new;
pub mod rename;
pub mod show;
pub mod study;
