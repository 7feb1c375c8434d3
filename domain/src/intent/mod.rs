//! Intent extraction domain: the structured summary of what a prompt asks for.

pub mod descriptor;
pub mod parsing;

pub use descriptor::IntentDescriptor;
pub use parsing::{IntentParseError, parse_intent};
