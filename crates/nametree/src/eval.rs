use std::collections::BTreeSet;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::tree::{Branch, NameTree};

/// What a tree reduces to once its branches have been decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution<T: Ord> {
    /// A route was attempted and definitively failed.
    Fail,
    /// No route is configured.
    Neg,
    /// The resolved destinations. Empty when the location has no members.
    Leaf(BTreeSet<T>),
}

impl<T: Ord> Resolution<T> {
    /// Collapse to the public contract: only a resolved set is a destination.
    ///
    /// `Fail` and `Neg` both become `None`. Callers that must tell a definite
    /// failure apart from a missing route have to match on the `Resolution`.
    pub fn into_option(self) -> Option<BTreeSet<T>> {
        match self {
            Self::Leaf(destinations) => Some(destinations),
            Self::Fail | Self::Neg => None,
        }
    }
}

/// Per-branch evaluation state.
enum Pending<T> {
    Alt,
    Union {
        destinations: BTreeSet<T>,
        resolved: bool,
    },
}

struct Frame<'a, T> {
    pending: Pending<T>,
    children: slice::Iter<'a, NameTree<T>>,
}

impl<'a, T: Ord> Frame<'a, T> {
    fn new(branch: Branch, children: &'a [NameTree<T>]) -> Self {
        let pending = match branch {
            Branch::Alt => Pending::Alt,
            Branch::Union => Pending::Union {
                destinations: BTreeSet::new(),
                resolved: false,
            },
        };
        Self {
            pending,
            children: children.iter(),
        }
    }

    /// Takes one child result. Returns the branch result once it is decided.
    fn absorb(&mut self, child: Resolution<T>) -> Option<Resolution<T>> {
        match (&mut self.pending, child) {
            (_, Resolution::Neg) => None,
            (Pending::Alt, decided) => Some(decided),
            (Pending::Union { .. }, Resolution::Fail) => Some(Resolution::Fail),
            (Pending::Union { destinations, resolved }, Resolution::Leaf(mut found)) => {
                destinations.append(&mut found);
                *resolved = true;
                None
            }
        }
    }

    fn finish(self) -> Resolution<T> {
        match self.pending {
            Pending::Union {
                destinations,
                resolved: true,
            } => Resolution::Leaf(destinations),
            Pending::Union { .. } | Pending::Alt => Resolution::Neg,
        }
    }
}

impl<T: Ord + Clone> NameTree<T> {
    /// Reduce the tree to `Fail`, `Neg` or a set of destinations.
    ///
    /// `Alt` takes the first child that is not `Neg`. `Union` merges every
    /// resolved child, skips `Neg` children, and fails as soon as any child
    /// fails. `Empty` resolves to the empty set.
    pub fn resolve(&self) -> Resolution<T> {
        let mut stack: Vec<Frame<'_, T>> = Vec::new();
        let mut next = Some(self);

        loop {
            let mut done = None;
            if let Some(node) = next.take() {
                done = match node {
                    NameTree::Union(children) => {
                        stack.push(Frame::new(Branch::Union, children));
                        None
                    }
                    NameTree::Alt(children) => {
                        stack.push(Frame::new(Branch::Alt, children));
                        None
                    }
                    NameTree::Leaf(value) => {
                        Some(Resolution::Leaf(BTreeSet::from([value.clone()])))
                    }
                    NameTree::Empty => Some(Resolution::Leaf(BTreeSet::new())),
                    NameTree::Fail => Some(Resolution::Fail),
                    NameTree::Neg => Some(Resolution::Neg),
                };
            }

            while next.is_none() {
                let Some(frame) = stack.last_mut() else {
                    return done.unwrap_or(Resolution::Neg);
                };
                let decided = match done.take() {
                    Some(child) => frame.absorb(child),
                    None => None,
                };
                if decided.is_some() {
                    stack.pop();
                    done = decided;
                    continue;
                }
                match frame.children.next() {
                    Some(child) => next = Some(child),
                    None => {
                        if let Some(frame) = stack.pop() {
                            done = Some(frame.finish());
                        }
                    }
                }
            }
        }
    }

    /// The destinations this tree routes to, if any.
    ///
    /// This deliberately narrows [`NameTree::resolve`]: a definite failure and
    /// the absence of any route both come back as `None`. The asymmetry is part
    /// of the contract; use `resolve` when the two must be told apart.
    pub fn eval(&self) -> Option<BTreeSet<T>> {
        self.resolve().into_option()
    }
}
