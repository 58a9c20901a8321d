//! Entity type definitions
//!
//! - [`Component`] - A device under test with nominal value and tolerance
//! - [`TestedComponent`] - A component with its simulated measurement
//! - [`Batch`] - The ordered set of components tested together

pub mod batch;
pub mod component;

pub use batch::Batch;
pub use component::{Component, ComponentKind, TestedComponent};
