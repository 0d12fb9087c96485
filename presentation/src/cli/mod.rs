pub mod commands;
pub mod scenario;
