use std::slice;

use crate::tree::{Branch, NameTree};

/// A branching node whose children are being simplified.
struct Frame<'a, T> {
    branch: Branch,
    pending: slice::Iter<'a, NameTree<T>>,
    survivors: Vec<NameTree<T>>,
}

impl<'a, T> Frame<'a, T> {
    fn new(branch: Branch, children: &'a [NameTree<T>]) -> Self {
        Self {
            branch,
            pending: children.iter(),
            survivors: Vec::with_capacity(children.len()),
        }
    }

    /// Takes one simplified child. Returns `false` once no later child can matter.
    fn absorb(&mut self, child: NameTree<T>) -> bool {
        match child {
            NameTree::Neg => true,
            NameTree::Fail => {
                // Alt keeps its earlier alternatives, Fail is the last resort.
                // Union cannot be combined once any member failed.
                if self.branch == Branch::Union {
                    self.survivors.clear();
                }
                self.survivors.push(NameTree::Fail);
                false
            }
            child => {
                self.survivors.push(child);
                true
            }
        }
    }

    fn finish(mut self) -> NameTree<T> {
        if self.survivors.len() > 1 {
            return self.branch.build(self.survivors);
        }
        self.survivors.pop().unwrap_or(NameTree::Neg)
    }
}

impl<T: Clone> NameTree<T> {
    /// Rewrite into the smallest tree that evaluates the same way.
    ///
    /// The result is a fixpoint: simplifying it again returns an equal tree.
    /// Children are walked with an explicit stack, so nesting depth costs heap,
    /// not call stack.
    pub fn simplified(&self) -> NameTree<T> {
        let mut stack: Vec<Frame<'_, T>> = Vec::new();
        let mut next = Some(self);

        loop {
            let mut done = None;
            if let Some(node) = next.take() {
                match node.as_branch() {
                    Some((branch, children)) => stack.push(Frame::new(branch, children)),
                    None => done = Some(node.clone()),
                }
            }

            while next.is_none() {
                let Some(frame) = stack.last_mut() else {
                    return done.unwrap_or(NameTree::Neg);
                };
                if let Some(child) = done.take() {
                    if !frame.absorb(child) {
                        frame.pending = Default::default();
                    }
                }
                match frame.pending.next() {
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
}
