//! Small standalone helpers that don't belong to a specific engine
//! component: path normalization and the line-diff renderer.

pub mod diff;
pub mod path;
