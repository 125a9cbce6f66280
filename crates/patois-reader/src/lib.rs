//! Patois reader: line-oriented text to runtime values.

mod reader;

pub use reader::{
    LineSource, Reader, StringSource, Syntax, PRIMARY_PROMPT, QUIT, SECONDARY_PROMPT,
};
