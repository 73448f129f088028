//! Rendering: drawing-surface capability and the two portrait modes.

pub mod portrait;
pub mod surface;
