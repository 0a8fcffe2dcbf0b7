pub mod finding;
pub mod tree;

pub use finding::Finding;
pub use tree::{build_tree, PathNode};
