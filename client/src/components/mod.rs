//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the static chrome around the routed outlet. They take no
//! props and read no context.

pub mod footer;
pub mod header;
