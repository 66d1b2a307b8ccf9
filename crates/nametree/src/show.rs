//! Canonical text rendering.
//!
//! `|` binds looser than `&`, so an `Alt` is parenthesised whenever it is an
//! operand, and a `Union` only when it is itself a `Union` operand. A branch
//! with a single child renders as that child.

use std::fmt;

use crate::tree::NameTree;

/// Where a subtree sits in the surrounding expression.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    Top,
    AltOperand,
    UnionOperand,
}

struct Shown<'a, T> {
    tree: &'a NameTree<T>,
    position: Position,
}

impl<T: fmt::Display> fmt::Display for Shown<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (separator, operand, parenthesised, children) = match self.tree {
            NameTree::Leaf(value) => return write!(f, "{value}"),
            NameTree::Fail => return f.write_str("!"),
            NameTree::Neg => return f.write_str("~"),
            NameTree::Empty => return f.write_str("$"),
            // Nothing to combine; `~` evaluates and simplifies the same way.
            NameTree::Union(children) | NameTree::Alt(children) if children.is_empty() => {
                return f.write_str("~");
            }
            NameTree::Union(children) | NameTree::Alt(children) if children.len() == 1 => {
                return write!(f, "{}", Shown { tree: &children[0], position: self.position });
            }
            NameTree::Alt(children) => (
                " | ",
                Position::AltOperand,
                self.position != Position::Top,
                children,
            ),
            NameTree::Union(children) => (
                " & ",
                Position::UnionOperand,
                self.position == Position::UnionOperand,
                children,
            ),
        };

        if parenthesised {
            f.write_str("(")?;
        }
        for (index, child) in children.iter().enumerate() {
            if index > 0 {
                f.write_str(separator)?;
            }
            write!(f, "{}", Shown { tree: child, position: operand })?;
        }
        if parenthesised {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl<T: fmt::Display> fmt::Display for NameTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Shown { tree: self, position: Position::Top }, f)
    }
}

impl<T: fmt::Display> NameTree<T> {
    /// Render in the grammar accepted by [`crate::read`], leaves via `Display`.
    pub fn show(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NameTree::{Empty, Fail, Leaf, Neg};

    fn alt(children: impl IntoIterator<Item = NameTree<u32>>) -> NameTree<u32> {
        NameTree::alt(children)
    }

    fn union(children: impl IntoIterator<Item = NameTree<u32>>) -> NameTree<u32> {
        NameTree::union(children)
    }

    #[test]
    fn atoms() {
        assert_eq!(Leaf(1).show(), "1");
        assert_eq!(NameTree::<u32>::Fail.show(), "!");
        assert_eq!(NameTree::<u32>::Neg.show(), "~");
        assert_eq!(NameTree::<u32>::Empty.show(), "$");
    }

    #[test]
    fn top_level_alt_has_no_parens() {
        let tree = alt([union([Leaf(1), Leaf(2)]), Leaf(3), Empty]);
        assert_eq!(tree.show(), "1 & 2 | 3 | $");
    }

    #[test]
    fn nested_alt_is_parenthesised() {
        assert_eq!(alt([alt([Leaf(1), Leaf(2)]), Leaf(3)]).show(), "(1 | 2) | 3");
        assert_eq!(union([alt([Leaf(1), Fail]), Leaf(3)]).show(), "(1 | !) & 3");
    }

    #[test]
    fn nested_union_inside_union_is_parenthesised() {
        assert_eq!(union([union([Leaf(1), Leaf(2)]), Leaf(3)]).show(), "(1 & 2) & 3");
        assert_eq!(alt([union([Leaf(1), Leaf(2)]), Neg]).show(), "1 & 2 | ~");
    }

    #[test]
    fn single_child_renders_as_child() {
        assert_eq!(alt([Leaf(1)]).show(), "1");
        assert_eq!(union([alt([Leaf(1), Leaf(2)])]).show(), "1 | 2");
        assert_eq!(
            union([union([alt([Leaf(1), Leaf(2)])]), Leaf(3)]).show(),
            "(1 | 2) & 3"
        );
    }

    #[test]
    fn childless_branch_renders_negative() {
        assert_eq!(alt([]).show(), "~");
        assert_eq!(union([alt([]), Leaf(1)]).show(), "~ & 1");
    }
}
