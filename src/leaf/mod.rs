//! Generic leaf optics.
//!
//! A small set of data-shape optics built from closures or standard
//! collections. They exist to drive the composition engine; domain-specific
//! leaves implement [`crate::Optic`] the same way.
//!
//! | Leaf                | Cardinality | Mutability | Direction | Index   |
//! |---------------------|-------------|------------|-----------|---------|
//! | [`FunctionLens`]    | One         | ReadWrite  | Uni       | `()`    |
//! | [`FunctionIso`]     | One         | ReadWrite  | Bi        | `()`    |
//! | [`FunctionPrism`]   | Many        | ReadWrite  | Bi        | `()`    |
//! | [`VecTraversal`]    | Many        | ReadWrite  | Uni       | `usize` |
//! | [`MapTraversal`]    | Many        | ReadWrite  | Uni       | key     |
//! | [`OptionTraversal`] | Many        | ReadWrite  | Uni       | `()`    |
//!
//! All of them are pure.

mod iso;
mod lens;
mod prism;
mod traversal;

pub use iso::FunctionIso;
pub use lens::FunctionLens;
pub use prism::FunctionPrism;
pub use traversal::{MapTraversal, OptionTraversal, VecTraversal};
