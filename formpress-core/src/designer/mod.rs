//! The interaction layer: a flat, mutable field collection plus a
//! small pointer-gesture state machine.
//!
//! There is no retained widget tree. Dragging needs only the last
//! pointer position and the field's last-committed geometry, so the
//! live gesture is a single enum value next to the collection.

mod controller;
mod gesture;

pub use controller::FormDesigner;
pub use gesture::Interaction;
