pub mod browse;
pub mod clear;
pub mod config;
pub mod context;
pub mod prompts;
pub mod search;
pub mod show;
pub mod watched;
