//! Parsing patterns into the supported syntax tree.
//!
//! Tokenizing is delegated to `regex-syntax`'s AST parser, which gives us
//! precise spans and well-worded diagnostics for malformed input. What is
//! *accepted* is decided here: the AST is lowered into [`SyntaxNode`], and
//! every construct outside the supported subset is rejected with an error
//! naming it. Nothing is ever partially honored.

use regex_syntax::ast::{self, Ast};
use regex_syntax::hir::{ClassUnicode, ClassUnicodeRange};

use crate::compiler::Config;
use crate::nfa::{CharSet, Look};
use crate::{CompileResult, ErrorKind, PatternSyntaxError, Unsupported};

/// A node in the syntax tree of a supported pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxNode {
    /// Matches the empty string.
    Empty,
    /// Matches one character from the set.
    Literal(CharSet),
    Concat(Vec<SyntaxNode>),
    Alternate(Vec<SyntaxNode>),
    /// `node` repeated between `min` and `max` times; `max` of `None` is
    /// unbounded. `(1, Some(1))` is a plain group. Invariant: `min <= max`.
    Group { node: Box<SyntaxNode>, min: u32, max: Option<u32> },
    StartAnchor,
    EndAnchor,
}

impl SyntaxNode {
    fn concat(mut nodes: Vec<SyntaxNode>) -> SyntaxNode {
        match nodes.len() {
            0 => SyntaxNode::Empty,
            1 => nodes.pop().unwrap_or(SyntaxNode::Empty),
            _ => SyntaxNode::Concat(nodes),
        }
    }

    fn group(node: SyntaxNode) -> SyntaxNode {
        SyntaxNode::Group { node: Box::new(node), min: 1, max: Some(1) }
    }

    fn repeat(node: SyntaxNode, min: u32, max: Option<u32>) -> SyntaxNode {
        // `(x)*` doesn't need the plain group around `x`.
        let node = match node {
            SyntaxNode::Group { node, min: 1, max: Some(1) } => *node,
            other => other,
        };
        SyntaxNode::Group { node: Box::new(node), min, max }
    }
}

/// Parse `pattern` with the default [`Config`].
pub fn parse(pattern: &str) -> CompileResult<SyntaxNode> {
    Parser::new(&Config::default()).parse(pattern)
}

/// A pattern parser.
#[derive(Clone, Debug)]
pub struct Parser {
    nest_limit: u32,
}

impl Parser {
    pub fn new(config: &Config) -> Parser {
        Parser { nest_limit: config.get_nest_limit() }
    }

    /// Parse `pattern` into a [`SyntaxNode`].
    pub fn parse(&self, pattern: &str) -> CompileResult<SyntaxNode> {
        let ast = ast::parse::ParserBuilder::new()
            .nest_limit(self.nest_limit)
            .build()
            .parse(pattern)
            .map_err(|err| tokenizer_error(pattern, &err))?;
        Lowerer { pattern }.top(&ast)
    }
}

/// Convert a byte offset from the tokenizer into a character offset.
fn char_offset(pattern: &str, byte_offset: usize) -> usize {
    pattern.get(..byte_offset).map_or(byte_offset, |prefix| prefix.chars().count())
}

fn tokenizer_error(pattern: &str, err: &ast::Error) -> PatternSyntaxError {
    let kind = match *err.kind() {
        ast::ErrorKind::UnsupportedLookAround => ErrorKind::Unsupported(Unsupported::LookAround),
        ast::ErrorKind::UnsupportedBackreference => {
            ErrorKind::Unsupported(Unsupported::Backreference)
        }
        ast::ErrorKind::RepetitionCountInvalid => ErrorKind::InvalidBound,
        ast::ErrorKind::NestLimitExceeded(limit) => ErrorKind::NestLimitExceeded(limit),
        ref other => ErrorKind::Parse(other.to_string()),
    };
    PatternSyntaxError::new(kind, char_offset(pattern, err.span().start.offset))
}

fn anchor(ast: &Ast) -> Option<Look> {
    match *ast {
        Ast::Assertion(ref assertion) => match assertion.kind {
            ast::AssertionKind::StartLine | ast::AssertionKind::StartText => Some(Look::Start),
            ast::AssertionKind::EndLine | ast::AssertionKind::EndText => Some(Look::End),
            _ => None,
        },
        _ => None,
    }
}

/// The ASCII meaning of `\d`, `\s` and `\w`.
fn perl_class(class: &ast::ClassPerl) -> ClassUnicode {
    let ranges: &[(char, char)] = match class.kind {
        ast::ClassPerlKind::Digit => &[('0', '9')],
        ast::ClassPerlKind::Space => &[('\t', '\r'), (' ', ' ')],
        ast::ClassPerlKind::Word => &[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')],
    };
    let mut set = ClassUnicode::new(ranges.iter().map(|&(s, e)| ClassUnicodeRange::new(s, e)));
    if class.negated {
        set.negate();
    }
    set
}

struct Lowerer<'p> {
    pattern: &'p str,
}

impl<'p> Lowerer<'p> {
    fn error(&self, kind: ErrorKind, span: &ast::Span) -> PatternSyntaxError {
        PatternSyntaxError::new(kind, char_offset(self.pattern, span.start.offset))
    }

    fn unsupported(&self, construct: Unsupported, span: &ast::Span) -> PatternSyntaxError {
        self.error(ErrorKind::Unsupported(construct), span)
    }

    /// Anchors are only legal here, at the edges of a top-level alternative.
    fn top(&self, ast: &Ast) -> CompileResult<SyntaxNode> {
        match *ast {
            Ast::Alternation(ref alt) => {
                let branches = alt
                    .asts
                    .iter()
                    .map(|branch| self.branch(branch))
                    .collect::<CompileResult<_>>()?;
                Ok(SyntaxNode::Alternate(branches))
            }
            _ => self.branch(ast),
        }
    }

    fn branch(&self, ast: &Ast) -> CompileResult<SyntaxNode> {
        let items = match *ast {
            Ast::Concat(ref concat) => &concat.asts[..],
            _ => std::slice::from_ref(ast),
        };
        let last = items.len().saturating_sub(1);
        let mut nodes = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let node = match anchor(item) {
                Some(Look::Start) if i == 0 => SyntaxNode::StartAnchor,
                Some(Look::End) if i == last => SyntaxNode::EndAnchor,
                _ => self.lower(item)?,
            };
            nodes.push(node);
        }
        Ok(SyntaxNode::concat(nodes))
    }

    fn lower(&self, ast: &Ast) -> CompileResult<SyntaxNode> {
        match *ast {
            Ast::Empty(_) => Ok(SyntaxNode::Empty),
            Ast::Flags(ref set) => Err(self.unsupported(Unsupported::InlineFlags, &set.span)),
            Ast::Literal(ref lit) => Ok(SyntaxNode::Literal(CharSet::single(lit.c))),
            Ast::Dot(_) => Ok(SyntaxNode::Literal(CharSet::any_except_newline())),
            Ast::Assertion(ref assertion) => match anchor(ast) {
                Some(_) => Err(self.error(ErrorKind::MisplacedAnchor, &assertion.span)),
                None => Err(self.unsupported(Unsupported::WordBoundary, &assertion.span)),
            },
            Ast::ClassUnicode(ref class) => {
                Err(self.unsupported(Unsupported::UnicodeClass, &class.span))
            }
            Ast::ClassPerl(ref class) => Ok(SyntaxNode::Literal(CharSet::from(&perl_class(class)))),
            Ast::ClassBracketed(ref class) => {
                Ok(SyntaxNode::Literal(CharSet::from(&self.bracketed(class)?)))
            }
            Ast::Repetition(ref rep) => self.repetition(rep),
            Ast::Group(ref group) => self.group(group),
            Ast::Alternation(ref alt) => {
                let branches =
                    alt.asts.iter().map(|branch| self.lower(branch)).collect::<CompileResult<_>>()?;
                Ok(SyntaxNode::Alternate(branches))
            }
            Ast::Concat(ref concat) => {
                let nodes =
                    concat.asts.iter().map(|item| self.lower(item)).collect::<CompileResult<_>>()?;
                Ok(SyntaxNode::concat(nodes))
            }
        }
    }

    fn repetition(&self, rep: &ast::Repetition) -> CompileResult<SyntaxNode> {
        if !rep.greedy {
            return Err(self.unsupported(Unsupported::LazyQuantifier, &rep.op.span));
        }
        let (min, max) = match rep.op.kind {
            ast::RepetitionKind::ZeroOrOne => (0, Some(1)),
            ast::RepetitionKind::ZeroOrMore => (0, None),
            ast::RepetitionKind::OneOrMore => (1, None),
            ast::RepetitionKind::Range(ref range) => match *range {
                ast::RepetitionRange::Exactly(n) => (n, Some(n)),
                ast::RepetitionRange::AtLeast(n) => (n, None),
                ast::RepetitionRange::Bounded(m, n) => (m, Some(n)),
            },
        };
        let node = self.lower(&rep.ast)?;
        Ok(SyntaxNode::repeat(node, min, max))
    }

    fn group(&self, group: &ast::Group) -> CompileResult<SyntaxNode> {
        if let ast::GroupKind::NonCapturing(ref flags) = group.kind {
            if !flags.items.is_empty() {
                return Err(self.unsupported(Unsupported::InlineFlags, &flags.span));
            }
        }
        Ok(SyntaxNode::group(self.lower(&group.ast)?))
    }

    fn bracketed(&self, class: &ast::ClassBracketed) -> CompileResult<ClassUnicode> {
        let mut set = match class.kind {
            ast::ClassSet::Item(ref item) => self.class_item(item)?,
            ast::ClassSet::BinaryOp(ref op) => {
                return Err(self.unsupported(Unsupported::ClassSetOperation, &op.span))
            }
        };
        if class.negated {
            set.negate();
        }
        Ok(set)
    }

    fn class_item(&self, item: &ast::ClassSetItem) -> CompileResult<ClassUnicode> {
        let set = match *item {
            ast::ClassSetItem::Empty(_) => ClassUnicode::empty(),
            ast::ClassSetItem::Literal(ref lit) => {
                ClassUnicode::new([ClassUnicodeRange::new(lit.c, lit.c)])
            }
            ast::ClassSetItem::Range(ref range) => {
                ClassUnicode::new([ClassUnicodeRange::new(range.start.c, range.end.c)])
            }
            ast::ClassSetItem::Ascii(ref class) => {
                return Err(self.unsupported(Unsupported::PosixClass, &class.span))
            }
            ast::ClassSetItem::Unicode(ref class) => {
                return Err(self.unsupported(Unsupported::UnicodeClass, &class.span))
            }
            ast::ClassSetItem::Perl(ref class) => perl_class(class),
            ast::ClassSetItem::Bracketed(ref class) => self.bracketed(class)?,
            ast::ClassSetItem::Union(ref union) => {
                let mut set = ClassUnicode::empty();
                for item in &union.items {
                    set.union(&self.class_item(item)?);
                }
                set
            }
        };
        Ok(set)
    }
}
