pub mod categorize;
pub mod config;
pub mod html;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod services;
pub mod validate;
