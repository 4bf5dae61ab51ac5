//! Diagnostics produced by the conformance checker
//!
//! Every violation is reported with the rule it breaks, a severity, the JSON
//! path of the offending value (`$.children[0].position.start`) and a message.
//! A [`Report`] collects them for one tree.

use serde::{Serialize, Serializer};
use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// The shape rule a diagnostic reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// A node is not an object
    NotANode,
    MissingType,
    /// `type` is not a string
    InvalidType,
    EmptyType,
    /// `data` is not an object
    InvalidData,
    /// `data` holds the reserved key `space`
    ReservedDataKey,
    /// `position` is not an object
    InvalidPosition,
    /// `start` or `end` is absent
    MissingPoint,
    /// A point is not an object, or a coordinate is missing, not an integer or negative
    InvalidPoint,
    /// Line or column below 1, or a coordinate too large to index with
    PointOutOfRange,
    StartAfterEnd,
    InvalidIndent,
    /// Line, column and offset disagree with the source text
    PointMismatch,
    /// A node has no position although positions are required
    MissingPosition,
    /// `children` is not an array
    InvalidChildren,
    ChildrenOutOfOrder,
    ChildOutsideParent,
    /// A node has both `children` and `value`
    HybridNode,
}

impl Rule {
    pub fn code(&self) -> &'static str {
        match self {
            Rule::NotANode => "not-a-node",
            Rule::MissingType => "missing-type",
            Rule::InvalidType => "invalid-type",
            Rule::EmptyType => "empty-type",
            Rule::InvalidData => "invalid-data",
            Rule::ReservedDataKey => "reserved-data-key",
            Rule::InvalidPosition => "invalid-position",
            Rule::MissingPoint => "missing-point",
            Rule::InvalidPoint => "invalid-point",
            Rule::PointOutOfRange => "point-out-of-range",
            Rule::StartAfterEnd => "start-after-end",
            Rule::InvalidIndent => "invalid-indent",
            Rule::PointMismatch => "point-mismatch",
            Rule::MissingPosition => "missing-position",
            Rule::InvalidChildren => "invalid-children",
            Rule::ChildrenOutOfOrder => "children-out-of-order",
            Rule::ChildOutsideParent => "child-outside-parent",
            Rule::HybridNode => "hybrid-node",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Rule::ChildrenOutOfOrder | Rule::ChildOutsideParent => Severity::Warning,
            Rule::HybridNode => Severity::Hint,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One reported violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule: Rule,
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(rule: Rule, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: rule.severity(),
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.rule, self.path, self.message
        )
    }
}

/// Result of checking one tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
    nodes_checked: usize,
    warnings_as_errors: bool,
}

impl Report {
    pub fn new(warnings_as_errors: bool) -> Self {
        Self {
            warnings_as_errors,
            ..Self::default()
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn count_node(&mut self) {
        self.nodes_checked += 1;
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn nodes_checked(&self) -> usize {
        self.nodes_checked
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    pub fn hints(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Hint)
    }

    pub fn has_rule(&self, rule: Rule) -> bool {
        self.diagnostics.iter().any(|d| d.rule == rule)
    }

    /// No errors, and no warnings either when warnings count as errors
    pub fn is_conforming(&self) -> bool {
        self.errors().next().is_none()
            && !(self.warnings_as_errors && self.warnings().next().is_some())
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        write!(
            f,
            "checked {} nodes: {} errors, {} warnings, {} hints",
            self.nodes_checked,
            self.errors().count(),
            self.warnings().count(),
            self.hints().count()
        )
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            conforming: bool,
            nodes_checked: usize,
            diagnostics: &'a [Diagnostic],
        }

        JsonReport {
            conforming: self.is_conforming(),
            nodes_checked: self.nodes_checked,
            diagnostics: &self.diagnostics,
        }
        .serialize(serializer)
    }
}
