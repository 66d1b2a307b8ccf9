//! The name tree value type.
//!
//! A `NameTree` is pure data: it is built once (by the parser or by composing
//! constructors) and never mutated. A live routing policy is swapped by
//! publishing a whole new tree.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameTree<T> {
    /// Combine the destinations of every child.
    Union(Vec<NameTree<T>>),
    /// Failover: the first child that is not negative wins.
    Alt(Vec<NameTree<T>>),
    Leaf(T),
    /// A route was attempted and definitively failed.
    Fail,
    /// No route exists here, try elsewhere.
    Neg,
    /// A valid location that currently has no members.
    Empty,
}

/// The two branching node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Branch {
    Union,
    Alt,
}

impl Branch {
    pub(crate) fn build<T>(self, children: Vec<NameTree<T>>) -> NameTree<T> {
        match self {
            Self::Union => NameTree::Union(children),
            Self::Alt => NameTree::Alt(children),
        }
    }
}

impl<T> NameTree<T> {
    pub fn leaf(value: T) -> Self {
        Self::Leaf(value)
    }

    pub fn alt(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Alt(children.into_iter().collect())
    }

    pub fn union(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Union(children.into_iter().collect())
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Union(_) | Self::Alt(_))
    }

    /// Children of a branching node; atoms have none.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Union(children) | Self::Alt(children) => children,
            Self::Leaf(_) | Self::Fail | Self::Neg | Self::Empty => &[],
        }
    }

    pub(crate) fn as_branch(&self) -> Option<(Branch, &[Self])> {
        match self {
            Self::Union(children) => Some((Branch::Union, children)),
            Self::Alt(children) => Some((Branch::Alt, children)),
            _ => None,
        }
    }

    /// Transform every leaf value, keeping the shape of the tree.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> NameTree<U> {
        self.map_with(&mut f)
    }

    fn map_with<U>(self, f: &mut impl FnMut(T) -> U) -> NameTree<U> {
        match self {
            Self::Union(children) => {
                NameTree::Union(children.into_iter().map(|child| child.map_with(f)).collect())
            }
            Self::Alt(children) => {
                NameTree::Alt(children.into_iter().map(|child| child.map_with(f)).collect())
            }
            Self::Leaf(value) => NameTree::Leaf(f(value)),
            Self::Fail => NameTree::Fail,
            Self::Neg => NameTree::Neg,
            Self::Empty => NameTree::Empty,
        }
    }

    /// Like [`NameTree::map`] but borrows the tree.
    pub fn map_ref<U>(&self, mut f: impl FnMut(&T) -> U) -> NameTree<U> {
        self.map_ref_with(&mut f)
    }

    fn map_ref_with<U>(&self, f: &mut impl FnMut(&T) -> U) -> NameTree<U> {
        match self {
            Self::Union(children) => {
                NameTree::Union(children.iter().map(|child| child.map_ref_with(f)).collect())
            }
            Self::Alt(children) => {
                NameTree::Alt(children.iter().map(|child| child.map_ref_with(f)).collect())
            }
            Self::Leaf(value) => NameTree::Leaf(f(value)),
            Self::Fail => NameTree::Fail,
            Self::Neg => NameTree::Neg,
            Self::Empty => NameTree::Empty,
        }
    }
}
