//! Terminal front end of the memory simulator.
//!
//! The binary wires [`shell::Shell`] to stdin/stdout; the modules are exposed
//! so the shell can be driven by scripted input in tests.

pub mod logger;
pub mod map;
pub mod shell;
