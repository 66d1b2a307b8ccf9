use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use chumsky::prelude::Rich;
use thiserror::Error;

/// Text that is not a valid name tree, path or dtab.
///
/// No partial result is ever returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {}", .span.start)]
pub struct SyntaxError {
    input: String,
    span: Range<usize>,
    message: String,
}

impl SyntaxError {
    pub(crate) fn new(input: &str, span: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            input: input.to_owned(),
            span,
            message: message.into(),
        }
    }

    /// Keeps the first error; later ones are usually knock-on effects.
    pub(crate) fn from_rich(input: &str, errors: Vec<Rich<'_, char>>) -> Self {
        match errors.into_iter().next() {
            Some(error) => Self::new(input, error.span().into_range(), error.to_string()),
            None => Self::new(input, input.len()..input.len(), "unexpected input"),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte range of the offending input.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Render a labelled excerpt of the input, without colour.
    pub fn report(&self, filename: &str) -> String {
        let mut bytes = Vec::new();
        let written = Report::build(ReportKind::Error, (filename, self.span.clone()))
            .with_config(Config::default().with_color(false))
            .with_message("invalid syntax")
            .with_label(Label::new((filename, self.span.clone())).with_message(&self.message))
            .finish()
            .write((filename, Source::from(self.input.as_str())), &mut bytes);
        match written {
            Ok(()) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}
