//! The parse-tree fragment (`Ctx`) the core reads, and the pluggable query
//! abstraction (spec §9) an embedding visitor uses to extract the two
//! string attributes (`thrown_type`, `caught_type`) the core can't derive
//! on its own. `Ctx` is otherwise opaque: the core only ever inspects
//! `kind`, `start_line`, and `token_index_range`.

/// What a single parse-tree fragment is, as far as the core cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Break,
    Return,
    Continue,
    Throw,
    Other,
}

/// A leaf statement (or condition, initializer, successor expression, ...)
/// carried in a basic block's value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ctx {
    pub start_line: u32,
    pub token_index_range: (usize, usize),
    pub kind: FragmentKind,
    /// Set only when `kind == Throw`: the type name of the instantiated
    /// exception, e.g. `"IOException"`.
    thrown_type: Option<String>,
}

impl Ctx {
    pub fn new(start_line: u32, token_index_range: (usize, usize), kind: FragmentKind) -> Self {
        debug_assert!(
            !matches!(kind, FragmentKind::Throw),
            "Ctx::new_throw must be used for THROW fragments so thrown_type is always set"
        );
        Ctx {
            start_line,
            token_index_range,
            kind,
            thrown_type: None,
        }
    }

    pub fn new_throw(
        start_line: u32,
        token_index_range: (usize, usize),
        thrown_type: impl Into<String>,
    ) -> Self {
        Ctx {
            start_line,
            token_index_range,
            kind: FragmentKind::Throw,
            thrown_type: Some(thrown_type.into()),
        }
    }

    /// The type name of the instantiated exception. `None` for any
    /// non-`Throw` fragment.
    pub fn thrown_type(&self) -> Option<&str> {
        self.thrown_type.as_deref()
    }
}

/// The source text of one `case`/`default` label in a switch statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseLabel {
    pub text: String,
}

impl CaseLabel {
    pub fn new(text: impl Into<String>) -> Self {
        CaseLabel { text: text.into() }
    }
}

/// One `catch (ExceptionType e)` clause: the type it matches against a
/// thrown exception's type name, and the source text used as the edge
/// label when a throw is routed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchClause {
    pub caught_type: String,
    pub clause_text: String,
}

impl CatchClause {
    pub fn new(caught_type: impl Into<String>, clause_text: impl Into<String>) -> Self {
        CatchClause {
            caught_type: caught_type.into(),
            clause_text: clause_text.into(),
        }
    }
}

/// Pushes the XPath-style (or equivalent) parse-tree queries a real visitor
/// needs behind a trait, so the core never has to know how a `Raw` parse
/// context is actually walked to find its exception type or catch type.
///
/// A Java-ANTLR-backed implementation of this trait would run the
/// `//classOrInterfaceTypeToInstantiate` / `//catchType` XPath queries the
/// original implementation used; this crate's core only ever sees the
/// already-extracted `Ctx`/`CatchClause` values.
pub trait ParseQuery {
    type Raw;

    fn thrown_type_of(&self, raw: &Self::Raw) -> Result<String, crate::error::CfgError>;
    fn caught_type_of(&self, raw: &Self::Raw) -> Result<String, crate::error::CfgError>;
}
