//! Terminal output for the `lead-hooks` binary

mod console;

pub use console::Console;
