//! Line-by-line processing of conditional directives.
//!
//! The processor keeps a stack of open conditional blocks. A plain line is
//! emitted only when no block on the stack suppresses it, so suppression by an
//! outer block always wins over anything nested inside it. Directive lines are
//! consumed and never emitted. Malformed or unbalanced directives produce a
//! [`Diagnostic`] and are otherwise ignored; the only fatal failure is a write
//! error on the output sink.

use crate::condition::{supported_operators, Condition};
use crate::directive::Directive;
use crate::env::Environment;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::fmt;
use std::io::Write;

/// A non-fatal problem in the directive structure of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    InvalidCondition { line: usize },
    UnmatchedElseIf { line: usize },
    UnmatchedElse { line: usize },
    UnmatchedEndif { line: usize },
    UnclosedBlock { line: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidCondition { line } => write!(
                f,
                "Line {line}: Invalid condition statement format. Supported operators: {}",
                supported_operators()
            ),
            Diagnostic::UnmatchedElseIf { line } => {
                write!(f, "Line {line}: Unmatched else if statement")
            }
            Diagnostic::UnmatchedElse { line } => write!(f, "Line {line}: Unmatched else statement"),
            Diagnostic::UnmatchedEndif { line } => {
                write!(f, "Line {line}: Unmatched endif statement")
            }
            Diagnostic::UnclosedBlock { line } => {
                write!(f, "Unclosed if block starting at line {line}")
            }
        }
    }
}

/// One open `if` ... `endif` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Line of the opening `if`
    pub line: usize,
    /// Lines in the current branch are hidden
    pub skip: bool,
    /// An `else` or `else if` has been seen at this level
    pub has_else: bool,
    /// Some branch at this level has already been taken
    pub matched: bool,
}

/// Open blocks, innermost last.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockStack {
    blocks: Vec<Block>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn pop(&mut self) -> Option<Block> {
        self.blocks.pop()
    }

    pub fn top(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Block> {
        self.blocks.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// True if any open block hides its lines.
    pub fn is_suppressed(&self) -> bool {
        self.blocks.iter().any(|b| b.skip)
    }

    /// True if any block enclosing the innermost one hides its lines.
    pub fn is_ancestor_suppressed(&self) -> bool {
        let enclosing = self.blocks.len().saturating_sub(1);
        self.blocks[..enclosing].iter().any(|b| b.skip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }
}

/// What happened to a line fed to the [`Processor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Emit,
    Suppress,
    Directive,
}

/// Directive state machine for a single document.
pub struct Processor<'a> {
    env: &'a Environment,
    stack: BlockStack,
    line: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Processor<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env, stack: BlockStack::new(), line: 0, diagnostics: Vec::new() }
    }

    /// Advances the state machine by one line and says whether it is emitted.
    pub fn feed(&mut self, line: &str) -> LineOutcome {
        self.line += 1;

        let Some(directive) = Directive::parse(line) else {
            return if self.stack.is_suppressed() {
                LineOutcome::Suppress
            } else {
                LineOutcome::Emit
            };
        };

        match directive {
            Directive::If(text) => self.open(text),
            Directive::ElseIf(text) => self.else_if(text),
            Directive::Else => self.otherwise(),
            Directive::Endif => self.close(),
        }
        LineOutcome::Directive
    }

    pub fn stack(&self) -> &BlockStack {
        &self.stack
    }

    /// Ends the document, reporting every block that is still open.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        let unclosed: Vec<usize> = self.stack.iter().map(|b| b.line).collect();
        for line in unclosed {
            self.report(Diagnostic::UnclosedBlock { line });
        }
        self.diagnostics
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    fn parse_condition(&mut self, text: &str) -> Option<Condition> {
        let condition = Condition::parse(text);
        if condition.is_none() {
            self.report(Diagnostic::InvalidCondition { line: self.line });
        }
        condition
    }

    fn open(&mut self, text: &str) {
        let Some(condition) = self.parse_condition(text) else {
            return;
        };

        let matched = if self.stack.is_suppressed() {
            false
        } else {
            let result = condition.evaluate(self.env);
            debug!("Line {}: if {} -> {}", self.line, condition, result);
            result
        };

        self.stack.push(Block { line: self.line, skip: !matched, has_else: false, matched });
    }

    fn else_if(&mut self, text: &str) {
        let line = self.line;
        let ancestor_suppressed = self.stack.is_ancestor_suppressed();
        let Some(block) = self.stack.top_mut() else {
            self.report(Diagnostic::UnmatchedElseIf { line });
            return;
        };
        block.has_else = true;
        if block.matched || ancestor_suppressed {
            block.skip = true;
            return;
        }

        let Some(condition) = self.parse_condition(text) else {
            return;
        };
        let result = condition.evaluate(self.env);
        debug!("Line {}: else if {} -> {}", line, condition, result);
        if let Some(block) = self.stack.top_mut() {
            block.skip = !result;
            block.matched = result;
        }
    }

    fn otherwise(&mut self) {
        let line = self.line;
        let Some(block) = self.stack.top_mut() else {
            self.report(Diagnostic::UnmatchedElse { line });
            return;
        };
        block.has_else = true;
        block.skip = block.matched;
    }

    fn close(&mut self) {
        if self.stack.pop().is_none() {
            self.report(Diagnostic::UnmatchedEndif { line: self.line });
        }
    }
}

/// Splits a document into lines on `\n`.
///
/// A single trailing newline terminates the last line rather than starting an
/// empty one. Carriage returns are kept.
pub fn split_lines(document: &str) -> impl Iterator<Item = &str> {
    let body = document.strip_suffix('\n').unwrap_or(document);
    (!document.is_empty()).then(|| body.split('\n')).into_iter().flatten()
}

/// Runs the directive state machine over `document`, writing surviving lines to `out`.
///
/// # Returns
/// * `Result<Vec<Diagnostic>>` - Structural problems found in the document
///
/// # Errors
/// * `Error::WriteError` if writing to `out` fails
pub fn process<W: Write + ?Sized>(
    document: &str,
    env: &Environment,
    out: &mut W,
) -> Result<Vec<Diagnostic>> {
    let mut processor = Processor::new(env);

    for line in split_lines(document) {
        if processor.feed(line) == LineOutcome::Emit {
            out.write_all(line.as_bytes()).map_err(Error::WriteError)?;
            out.write_all(b"\n").map_err(Error::WriteError)?;
        }
    }

    Ok(processor.finish())
}
