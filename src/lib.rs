// Quill - interactive query console
// Library exports

pub mod backend;
pub mod cli;
pub mod config;
pub mod connection;
pub mod errors;
pub mod lexer;
pub mod runtime;
