pub mod aws;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod session;
pub mod settings;
