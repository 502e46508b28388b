pub mod accounts;
pub mod project;
pub mod task;
