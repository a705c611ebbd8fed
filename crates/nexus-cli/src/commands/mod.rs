pub mod config;
pub mod context;
pub mod details;
pub mod journal;
pub mod prompts;
pub mod render;
pub mod search;
pub mod stats;
pub mod ui;
pub mod wishlist;
