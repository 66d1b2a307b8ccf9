use std::str::FromStr;

use chumsky::Boxed;
use chumsky::prelude::*;

use crate::path::{Path, path};
use crate::tree::{Branch, NameTree};

mod error;
pub use error::SyntaxError;

mod limits;
pub use limits::{DEFAULT_MAX_DEPTH, ParseOptions};
pub(crate) use limits::check_nesting;

pub type Extra<'src> = extra::Err<Rich<'src, char>>;

type Grammar<'src, T> = Boxed<'src, 'src, &'src str, NameTree<T>, Extra<'src>>;

/// Grammar for a name tree over leaves parsed by `leaf`.
///
/// ```text
/// tree       ::= alt-expr
/// alt-expr   ::= union-expr ('|' union-expr)*
/// union-expr ::= atom ('&' atom)*
/// atom       ::= leaf | '!' | '~' | '$' | '(' alt-expr ')'
/// ```
///
/// Operands are kept in source order. A run of one operand is that operand,
/// never a single-child branch; no other simplification happens here.
///
/// Groups nest at most `max_depth` deep. The bound is part of the grammar,
/// one level per allowed group, so it holds whatever characters `leaf`
/// accepts, parentheses included.
pub fn tree<'src, T, L>(
    leaf: L,
    max_depth: usize,
) -> impl Parser<'src, &'src str, NameTree<T>, Extra<'src>> + Clone
where
    T: Clone + 'src,
    L: Parser<'src, &'src str, T, Extra<'src>> + Clone + 'src,
{
    let mut grammar = level(leaf.clone(), None);
    for _ in 0..max_depth {
        grammar = level(leaf.clone(), Some(grammar));
    }
    grammar
}

/// One nesting level; `group` is the grammar allowed inside its parentheses.
fn level<'src, T, L>(leaf: L, group: Option<Grammar<'src, T>>) -> Grammar<'src, T>
where
    T: Clone + 'src,
    L: Parser<'src, &'src str, T, Extra<'src>> + Clone + 'src,
{
    let atom: Grammar<'src, T> = choice((
        leaf.map(NameTree::Leaf),
        just('!').to(NameTree::Fail),
        just('~').to(NameTree::Neg),
        just('$').to(NameTree::Empty),
    ))
    .boxed();
    let atom: Grammar<'src, T> = match group {
        Some(group) => atom.or(group.delimited_by(just('('), just(')'))).boxed(),
        None => atom,
    };
    let atom = atom.padded();

    let union_expr = atom
        .separated_by(just('&'))
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|operands| operator(Branch::Union, operands));

    union_expr
        .separated_by(just('|'))
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|operands| operator(Branch::Alt, operands))
        .boxed()
}

fn operator<T>(branch: Branch, operands: Vec<NameTree<T>>) -> NameTree<T> {
    match <[NameTree<T>; 1]>::try_from(operands) {
        Ok([operand]) => operand,
        Err(operands) => branch.build(operands),
    }
}

/// Run `parser` over the whole of `text`.
pub(crate) fn parse_all<'src, O>(
    parser: impl Parser<'src, &'src str, O, Extra<'src>>,
    text: &'src str,
) -> Result<O, SyntaxError> {
    parser
        .then_ignore(end())
        .parse(text)
        .into_result()
        .map_err(|errors| {
            let error = SyntaxError::from_rich(text, errors);
            log::debug!("failed to parse {text:?}: {error}");
            error
        })
}

/// Parse a tree of paths, e.g. `/s/a & /s/b | /s/backup | $`.
pub fn read(text: &str) -> Result<NameTree<Path>, SyntaxError> {
    read_with_options(text, &ParseOptions::default())
}

/// Like [`read`], with a caller-chosen nesting limit.
///
/// Paths never contain parentheses, so excess nesting is reported up front,
/// pointing at the first `(` beyond the limit.
pub fn read_with_options(
    text: &str,
    options: &ParseOptions,
) -> Result<NameTree<Path>, SyntaxError> {
    check_nesting(text, options.max_depth)?;
    read_with(text, path(), options)
}

/// Parse a tree whose leaves use a caller-supplied grammar.
///
/// `leaf` may accept any characters, parentheses included; nesting beyond
/// `options.max_depth` is still rejected by the tree grammar itself.
pub fn read_with<'src, T, L>(
    text: &'src str,
    leaf: L,
    options: &ParseOptions,
) -> Result<NameTree<T>, SyntaxError>
where
    T: Clone + 'src,
    L: Parser<'src, &'src str, T, Extra<'src>> + Clone + 'src,
{
    parse_all(tree(leaf, options.max_depth), text)
}

impl FromStr for NameTree<Path> {
    type Err = SyntaxError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        read(text)
    }
}
