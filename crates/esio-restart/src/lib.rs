//! Template-based restart file rotation: renaming a freshly written file
//! into slot 0 of a `#`-templated sequence, shifting existing generations up
//! and dropping whatever falls off the retention window. Entirely
//! filesystem-local; no communicator or substrate involved.

mod nextindex;
mod rotate;

pub use nextindex::nextindex;
pub use rotate::rotate;
