pub mod auth;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod router;
pub mod schemas;
pub mod session;
pub mod uploads;
pub mod views;

#[cfg(test)]
mod test_utils;
