//! CLI command implementations.

pub(crate) mod formats;
pub(crate) mod render;

pub(crate) use render::RenderArgs;
