//! CLI command implementations

pub mod channels;
pub mod json_output;
pub mod pack;
pub mod template;
pub mod unpack;
