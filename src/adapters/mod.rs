//! Adapters: implementations of the outbound ports plus the HTTP transport.

pub mod ai;
pub mod http;
mod script_file;

pub use script_file::FileScriptSource;
