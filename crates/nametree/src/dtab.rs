//! Delegation tables: ordered `prefix => tree` rewrite rules.
//!
//! ```text
//! /s => /s/local | /s/remote;
//! /s/billing => /s/billing-canary & /s/billing
//! ```

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use chumsky::prelude::*;
use serde::{Deserialize, Serialize};

use crate::parser::{Extra, ParseOptions, SyntaxError, check_nesting, parse_all, tree};
use crate::path::{Path, path};
use crate::tree::NameTree;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dentry {
    pub prefix: Path,
    pub dst: NameTree<Path>,
}

impl Dentry {
    pub fn new(prefix: Path, dst: NameTree<Path>) -> Self {
        Self { prefix, dst }
    }

    pub fn read(text: &str) -> Result<Self, SyntaxError> {
        Self::read_with_options(text, &ParseOptions::default())
    }

    pub fn read_with_options(text: &str, options: &ParseOptions) -> Result<Self, SyntaxError> {
        check_nesting(text, options.max_depth)?;
        parse_all(dentry(options.max_depth), text)
    }
}

impl fmt::Display for Dentry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=>{}", self.prefix, self.dst)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dtab {
    dentries: Vec<Dentry>,
}

impl Dtab {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(dentries: impl IntoIterator<Item = Dentry>) -> Self {
        Self {
            dentries: dentries.into_iter().collect(),
        }
    }

    pub fn read(text: &str) -> Result<Self, SyntaxError> {
        Self::read_with_options(text, &ParseOptions::default())
    }

    pub fn read_with_options(text: &str, options: &ParseOptions) -> Result<Self, SyntaxError> {
        check_nesting(text, options.max_depth)?;
        parse_all(dtab(options.max_depth), text)
    }

    pub fn len(&self) -> usize {
        self.dentries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dentries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dentry> {
        self.dentries.iter()
    }

    pub fn push(&mut self, dentry: Dentry) {
        self.dentries.push(dentry);
    }

    /// This table followed by `other`; entries of `other` take precedence.
    pub fn concat(&self, other: &Dtab) -> Dtab {
        let mut dentries = Vec::with_capacity(self.len() + other.len());
        dentries.extend_from_slice(&self.dentries);
        dentries.extend_from_slice(&other.dentries);
        Dtab { dentries }
    }

    /// Rewrite `path` through every entry whose prefix matches it.
    ///
    /// Each matching destination gets the unmatched rest of `path` appended
    /// to its leaves. Later entries are tried first, earlier ones become
    /// fallbacks; without any match the result is `Neg`.
    pub fn lookup(&self, path: &Path) -> NameTree<Path> {
        let matches: Vec<NameTree<Path>> = self
            .dentries
            .iter()
            .rev()
            .filter_map(|dentry| {
                let suffix = path.strip_prefix(&dentry.prefix)?;
                Some(dentry.dst.map_ref(|dst| dst.concat(&suffix)))
            })
            .collect();
        log::trace!("{path}: {} of {} dentries match", matches.len(), self.len());

        match <[NameTree<Path>; 1]>::try_from(matches) {
            Ok([only]) => only,
            Err(matches) if matches.is_empty() => NameTree::Neg,
            Err(matches) => NameTree::Alt(matches),
        }
    }

    /// The same table with every destination simplified.
    pub fn simplified(&self) -> Dtab {
        Dtab {
            dentries: self
                .dentries
                .iter()
                .map(|dentry| Dentry::new(dentry.prefix.clone(), dentry.dst.simplified()))
                .collect(),
        }
    }
}

impl fmt::Display for Dtab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, dentry) in self.dentries.iter().enumerate() {
            if index > 0 {
                f.write_str(";")?;
            }
            write!(f, "{dentry}")?;
        }
        Ok(())
    }
}

impl FromStr for Dtab {
    type Err = SyntaxError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::read(text)
    }
}

impl Add for Dtab {
    type Output = Dtab;

    fn add(mut self, other: Dtab) -> Dtab {
        self.dentries.extend(other.dentries);
        self
    }
}

impl<'a> IntoIterator for &'a Dtab {
    type Item = &'a Dentry;
    type IntoIter = std::slice::Iter<'a, Dentry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn dentry<'src>(max_depth: usize) -> impl Parser<'src, &'src str, Dentry, Extra<'src>> + Clone {
    path()
        .padded()
        .then_ignore(just("=>"))
        .then(tree(path(), max_depth))
        .map(|(prefix, dst)| Dentry { prefix, dst })
}

fn dtab<'src>(max_depth: usize) -> impl Parser<'src, &'src str, Dtab, Extra<'src>> + Clone {
    dentry(max_depth)
        .separated_by(just(';'))
        .allow_trailing()
        .collect::<Vec<_>>()
        .padded()
        .map(|dentries| Dtab { dentries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MAX_DEPTH;

    fn p(text: &str) -> Path {
        Path::read(text).unwrap()
    }

    fn t(text: &str) -> NameTree<Path> {
        crate::read(text).unwrap()
    }

    #[test]
    fn parses_entries_in_order() {
        let dtab = Dtab::read("/s => /a | /b ; /s/x=>/c & /d;").unwrap();
        assert_eq!(
            dtab,
            Dtab::new([
                Dentry::new(p("/s"), t("/a | /b")),
                Dentry::new(p("/s/x"), t("/c & /d")),
            ])
        );
        assert_eq!(dtab.to_string(), "/s=>/a | /b;/s/x=>/c & /d");
    }

    #[test]
    fn empty_table() {
        assert!(Dtab::read("").unwrap().is_empty());
        assert!(Dtab::read("  ").unwrap().is_empty());
        assert_eq!(Dtab::empty().to_string(), "");
    }

    #[test]
    fn malformed_tables_are_rejected() {
        for text in ["/s", "/s =>", "=> /a", "/s => /a;;", "/s => (/a", "s => /a"] {
            assert!(Dtab::read(text).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn display_round_trips() {
        let dtab = Dtab::read("/s=>(/a | !) & /b;/=>~;/x=>$").unwrap();
        assert_eq!(Dtab::read(&dtab.to_string()).unwrap(), dtab);
    }

    #[test]
    fn lookup_without_match_is_negative() {
        let dtab = Dtab::read("/s => /a").unwrap();
        assert_eq!(dtab.lookup(&p("/t/x")), NameTree::Neg);
        assert_eq!(Dtab::empty().lookup(&p("/s")), NameTree::Neg);
    }

    #[test]
    fn lookup_appends_suffix() {
        let dtab = Dtab::read("/s => /srv/a & /srv/b").unwrap();
        assert_eq!(dtab.lookup(&p("/s/users/1")), t("/srv/a/users/1 & /srv/b/users/1"));
        assert_eq!(dtab.lookup(&p("/s")), t("/srv/a & /srv/b"));
    }

    #[test]
    fn later_entries_take_precedence() {
        let dtab = Dtab::read("/s => /old; /t => /other; /s/users => /new").unwrap();
        assert_eq!(dtab.lookup(&p("/s/users/1")), t("/new/1 | /old/users/1"));
    }

    #[test]
    fn lookup_keeps_atoms() {
        let dtab = Dtab::read("/s => ! | $").unwrap();
        assert_eq!(dtab.lookup(&p("/s/x")), NameTree::alt([NameTree::Fail, NameTree::Empty]));
    }

    #[test]
    fn concat_and_add_append() {
        let base = Dtab::read("/s => /a").unwrap();
        let overrides = Dtab::read("/s => /b").unwrap();
        let combined = base.concat(&overrides);
        assert_eq!(combined, base.clone() + overrides);
        assert_eq!(combined.lookup(&p("/s")), t("/b | /a"));
        assert_eq!(combined.iter().count(), 2);
    }

    #[test]
    fn simplified_simplifies_destinations() {
        let dtab = Dtab::read("/s => ~ | /a | ! | /b").unwrap();
        assert_eq!(dtab.simplified(), Dtab::read("/s => /a | !").unwrap());
    }

    #[test]
    fn dentry_read() {
        assert_eq!(Dentry::read("/a=>/b").unwrap(), Dentry::new(p("/a"), t("/b")));
        assert!(Dentry::read("/a=>/b;").is_err());
    }

    #[test]
    fn dentry_read_honours_options() {
        let options = ParseOptions::default().with_max_depth(1);
        assert!(Dentry::read_with_options("/a=>(/b)", &options).is_ok());
        let error = Dentry::read_with_options("/a=>((/b))", &options).unwrap_err();
        assert_eq!(error.span(), 5..6);
        assert!(Dentry::read("/a=>((/b))").is_ok());
    }

    #[test]
    fn default_depth_limit() {
        let depth = DEFAULT_MAX_DEPTH;
        let nested = |levels: usize| {
            format!("/s => {}/a{}", "(".repeat(levels), ")".repeat(levels))
        };
        assert_eq!(Dtab::read(&nested(depth)).unwrap().lookup(&p("/s/x")), t("/a/x"));
        let error = Dtab::read(&nested(depth + 1)).unwrap_err();
        assert_eq!(error.span(), 6 + depth..7 + depth);
    }
}
