//! Mesh approximations of various geometric shapes.

mod plane;
mod subdiv;

pub use plane::*;
pub use subdiv::*;
