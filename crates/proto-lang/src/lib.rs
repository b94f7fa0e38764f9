//
// lib.rs
//
// Library crate root, shared by the server binary and integration tests
//

pub mod analysis;
pub mod backend;
pub mod completion;
pub mod config;
pub mod diagnostics;
pub mod handlers;
pub mod imports;
pub mod module;
pub mod parser;
pub mod position;
pub mod state;
