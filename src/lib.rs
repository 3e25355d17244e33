//! lsys - L-system grammar engine with turtle-graphics output

pub mod core;
pub mod engine;
pub mod grammar;
pub mod loader;
pub mod turtle;
