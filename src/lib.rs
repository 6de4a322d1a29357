// Library interface for logdeck
// Exposes the console engine for hosts embedding it and for the replay binary

pub mod compiler;
pub mod config;
pub mod console;
pub mod entry;
pub mod event;
pub mod filter;
pub mod persistence;
pub mod stack;
pub mod store;
pub mod view;
