//! Pluggable on-disk layout strategies for distributed 3-D arrays: the
//! registry that resolves a metadata block's `layout_tag`, and the dense
//! `Layout0` strategy every dataset uses until a second layout ships.

mod layout0;
mod piece;
mod registry;
mod strategy;

pub use layout0::{Layout0, LAYOUT0_TAG};
pub use piece::{AxisPiece, LocalPiece};
pub use registry::LayoutRegistry;
pub use strategy::LayoutStrategy;
