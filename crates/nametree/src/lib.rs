//! Name trees: the routing algebra behind failover and load-balanced unions.
//!
//! ```text
//! /s/users-a & /s/users-b | /s/users-backup | $
//! ```
//!
//! Leaves are destinations, `&` combines destinations (`Union`), `|` tries
//! alternatives in order (`Alt`), and `!`, `~`, `$` are failure, no route and
//! an empty destination set. Trees are immutable values that can be shared
//! freely between threads; a changed policy is a new tree.
//!
//! - [`read`] parses the text form, [`NameTree::show`] renders it back.
//! - [`NameTree::simplified`] normalizes without changing what a tree evaluates to.
//! - [`NameTree::eval`] produces the destinations a caller should use.
//! - [`Dtab`] rewrites paths through `prefix => tree` rules.

mod eval;
mod show;
mod simplify;
mod tree;

pub mod dtab;
pub mod parser;
pub mod path;

pub use dtab::{Dentry, Dtab};
pub use eval::Resolution;
pub use parser::{DEFAULT_MAX_DEPTH, ParseOptions, SyntaxError, read, read_with, read_with_options};
pub use path::Path;
pub use tree::NameTree;
