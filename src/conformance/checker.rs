//! Shape-matching conformance checker
//!
//! The checker works on untyped JSON values: a value conforms when it has the
//! right shape, whatever produced it. Typed trees go through serde first (see
//! [`Checker::check_tree`]).
//!
//! A present `null` is treated like an absent key for `data`, `position` and
//! `children`. For `value` it counts as present.

use super::diagnostics::{Diagnostic, Report, Rule};
use crate::ast::{Point, Position, SourceLocation, RESERVED_KEY};
use crate::config::CheckerConfig;
use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

pub struct Checker {
    config: CheckerConfig,
    source: Option<SourceLocation>,
}

impl Checker {
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// Also verify that every point agrees with this source text
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(SourceLocation::new(source));
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a tree given as a JSON value
    pub fn check(&self, tree: &Value) -> Report {
        tracing::debug!(with_source = self.source.is_some(), "checking tree");

        let mut report = Report::new(self.config.warnings_as_errors);
        self.check_node(tree, "$", &mut report);

        tracing::debug!(
            nodes = report.nodes_checked(),
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "check finished"
        );
        report
    }

    /// Check a typed tree through its serialized shape
    pub fn check_tree<T: Serialize + ?Sized>(&self, tree: &T) -> Result<Report> {
        let value = serde_json::to_value(tree)?;
        Ok(self.check(&value))
    }

    /// Returns the node's position when it is present and well formed
    fn check_node(&self, value: &Value, path: &str, report: &mut Report) -> Option<Position> {
        report.count_node();
        tracing::trace!(path, "checking node");

        let Some(node) = value.as_object() else {
            report.push(Diagnostic::new(
                Rule::NotANode,
                path,
                format!("expected a node object, found {}", describe(value)),
            ));
            return None;
        };

        self.check_type(node, path, report);

        if let Some(data) = present(node, "data") {
            self.check_data(data, &format!("{path}.data"), report);
        }

        let position = match present(node, "position") {
            Some(position) => self.check_position(position, &format!("{path}.position"), report),
            None => {
                if self.config.require_positions {
                    report.push(Diagnostic::new(
                        Rule::MissingPosition,
                        path,
                        "node has no position but every node must come from source",
                    ));
                }
                None
            }
        };

        if let Some(children) = present(node, "children") {
            self.check_children(
                children,
                position.as_ref(),
                &format!("{path}.children"),
                report,
            );
        }

        if self.config.report_hybrid_nodes
            && present(node, "children").is_some()
            && node.contains_key("value")
        {
            report.push(Diagnostic::new(
                Rule::HybridNode,
                path,
                "node has both `children` and `value`",
            ));
        }

        position
    }

    fn check_type(&self, node: &Map<String, Value>, path: &str, report: &mut Report) {
        match node.get("type") {
            None => report.push(Diagnostic::new(
                Rule::MissingType,
                path,
                "node has no `type`",
            )),
            Some(Value::String(label)) if label.is_empty() => report.push(Diagnostic::new(
                Rule::EmptyType,
                format!("{path}.type"),
                "`type` must be a non-empty label",
            )),
            Some(Value::String(_)) => {}
            Some(other) => report.push(Diagnostic::new(
                Rule::InvalidType,
                format!("{path}.type"),
                format!("expected `type` to be a string, found {}", describe(other)),
            )),
        }
    }

    fn check_data(&self, data: &Value, path: &str, report: &mut Report) {
        match data.as_object() {
            Some(map) if map.contains_key(RESERVED_KEY) => report.push(Diagnostic::new(
                Rule::ReservedDataKey,
                format!("{path}.{RESERVED_KEY}"),
                format!("data key `{RESERVED_KEY}` is reserved and must stay unused"),
            )),
            Some(_) => {}
            None => report.push(Diagnostic::new(
                Rule::InvalidData,
                path,
                format!("expected `data` to be an object, found {}", describe(data)),
            )),
        }
    }

    fn check_position(&self, value: &Value, path: &str, report: &mut Report) -> Option<Position> {
        let Some(position) = value.as_object() else {
            report.push(Diagnostic::new(
                Rule::InvalidPosition,
                path,
                format!("expected `position` to be an object, found {}", describe(value)),
            ));
            return None;
        };

        let start = self.check_point(position, "start", path, report);
        let end = self.check_point(position, "end", path, report);
        let indent = self.check_indent(present(position, "indent"), path, report);

        let (start, end) = (start?, end?);
        if start.line_column() > end.line_column() || start.offset > end.offset {
            report.push(Diagnostic::new(
                Rule::StartAfterEnd,
                path,
                format!(
                    "start {} (offset {}) is after end {} (offset {})",
                    start, start.offset, end, end.offset
                ),
            ));
            return None;
        }

        let indent = self.check_indent_lines(indent, &start, &end, path, report);
        Some(Position::new(start, end).with_indent(indent))
    }

    fn check_point(
        &self,
        position: &Map<String, Value>,
        name: &str,
        path: &str,
        report: &mut Report,
    ) -> Option<Point> {
        let path = format!("{path}.{name}");
        let Some(value) = present(position, name) else {
            report.push(Diagnostic::new(
                Rule::MissingPoint,
                path,
                format!("position has no `{name}` point"),
            ));
            return None;
        };
        let Some(point) = value.as_object() else {
            report.push(Diagnostic::new(
                Rule::InvalidPoint,
                path,
                format!("expected `{name}` to be an object, found {}", describe(value)),
            ));
            return None;
        };

        let line = coordinate(point, "line", 1, &path, report);
        let column = coordinate(point, "column", 1, &path, report);
        let offset = coordinate(point, "offset", 0, &path, report);
        let point = Point::new(line?, column?, offset?);

        if let Some(source) = &self.source {
            if !source.agrees(&point) {
                let message = match source.point_at(point.offset) {
                    Ok(expected) => format!(
                        "point {} (offset {}) does not match the source, where offset {} is at {}",
                        point, point.offset, point.offset, expected
                    ),
                    Err(err) => format!("point {} does not match the source: {}", point, err),
                };
                report.push(Diagnostic::new(Rule::PointMismatch, path, message));
            }
        }

        Some(point)
    }

    /// Invalid indents are reported and replaced by an empty list
    fn check_indent(&self, indent: Option<&Value>, path: &str, report: &mut Report) -> Vec<usize> {
        let path = format!("{path}.indent");
        match indent {
            None => Vec::new(),
            Some(Value::Array(columns)) => {
                let mut valid = Vec::with_capacity(columns.len());
                for (index, column) in columns.iter().enumerate() {
                    match column_value(column) {
                        Some(column) => valid.push(column),
                        None => {
                            report.push(Diagnostic::new(
                                Rule::InvalidIndent,
                                format!("{path}[{index}]"),
                                format!(
                                    "indent entries must be columns of 1 or greater, found {}",
                                    column
                                ),
                            ));
                            return Vec::new();
                        }
                    }
                }
                valid
            }
            Some(single) => match column_value(single) {
                Some(column) => vec![column],
                None => {
                    report.push(Diagnostic::new(
                        Rule::InvalidIndent,
                        path,
                        format!(
                            "expected `indent` to be a column or a list of columns, found {}",
                            single
                        ),
                    ));
                    Vec::new()
                }
            },
        }
    }

    /// A non-empty indent needs one column per line after the first, and with
    /// source text each column must be that line's first non-blank column.
    fn check_indent_lines(
        &self,
        indent: Vec<usize>,
        start: &Point,
        end: &Point,
        path: &str,
        report: &mut Report,
    ) -> Vec<usize> {
        let path = format!("{path}.indent");
        let expected = end.line - start.line;
        if indent.is_empty() {
            return indent;
        }
        if indent.len() != expected {
            report.push(Diagnostic::new(
                Rule::InvalidIndent,
                path,
                format!(
                    "expected {} indent columns, one per line after the first, found {}",
                    expected,
                    indent.len()
                ),
            ));
            return Vec::new();
        }

        if let Some(source) = &self.source {
            for (index, &column) in indent.iter().enumerate() {
                let line = start.line + 1 + index;
                // Missing lines already show up as a point mismatch on `end`
                if let Some(first) = source.line_indent(line).filter(|first| *first != column) {
                    report.push(Diagnostic::new(
                        Rule::InvalidIndent,
                        format!("{path}[{index}]"),
                        format!(
                            "indent column {column} does not match the source, where line {line} starts at column {first}"
                        ),
                    ));
                }
            }
        }

        indent
    }

    fn check_children(
        &self,
        children: &Value,
        parent: Option<&Position>,
        path: &str,
        report: &mut Report,
    ) {
        let Some(children) = children.as_array() else {
            report.push(Diagnostic::new(
                Rule::InvalidChildren,
                path,
                format!(
                    "expected `children` to be an array, found {}",
                    describe(children)
                ),
            ));
            return;
        };

        let mut previous: Option<Position> = None;
        for (index, child) in children.iter().enumerate() {
            let child_path = format!("{path}[{index}]");
            let Some(position) = self.check_node(child, &child_path, report) else {
                continue;
            };

            if self.config.check_containment {
                if let Some(parent) = parent {
                    if !parent.encloses(&position) {
                        report.push(Diagnostic::new(
                            Rule::ChildOutsideParent,
                            &child_path,
                            format!("child at {} lies outside its parent at {}", position, parent),
                        ));
                    }
                }
            }

            if self.config.check_sibling_order {
                if let Some(previous) = &previous {
                    if position.start < previous.start {
                        report.push(Diagnostic::new(
                            Rule::ChildrenOutOfOrder,
                            &child_path,
                            format!(
                                "child starts at {}, before its previous sibling at {}",
                                position.start, previous.start
                            ),
                        ));
                    }
                }
            }

            previous = Some(position);
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(CheckerConfig::default())
    }
}

/// A key whose value is present and not `null`
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

/// Read one point coordinate, reporting why it is unusable
fn coordinate(
    point: &Map<String, Value>,
    name: &str,
    minimum: u64,
    path: &str,
    report: &mut Report,
) -> Option<usize> {
    let Some(value) = point.get(name) else {
        report.push(Diagnostic::new(
            Rule::InvalidPoint,
            path,
            format!("point has no `{name}`"),
        ));
        return None;
    };

    match (value.as_u64(), value.as_i64()) {
        (Some(n), _) if n >= minimum => match usize::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                report.push(Diagnostic::new(
                    Rule::PointOutOfRange,
                    format!("{path}.{name}"),
                    format!("`{name}` {n} is too large for this platform"),
                ));
                None
            }
        },
        (Some(n), _) => {
            report.push(Diagnostic::new(
                Rule::PointOutOfRange,
                format!("{path}.{name}"),
                format!("`{name}` must be {minimum} or greater, found {n}"),
            ));
            None
        }
        (None, Some(n)) => {
            report.push(Diagnostic::new(
                Rule::InvalidPoint,
                format!("{path}.{name}"),
                format!("`{name}` must be a non-negative integer, found {n}"),
            ));
            None
        }
        (None, None) => {
            report.push(Diagnostic::new(
                Rule::InvalidPoint,
                format!("{path}.{name}"),
                format!("`{name}` must be an integer, found {}", describe(value)),
            ));
            None
        }
    }
}

fn column_value(value: &Value) -> Option<usize> {
    value
        .as_u64()
        .filter(|column| *column >= 1)
        .and_then(|column| usize::try_from(column).ok())
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a fractional number",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
