//! Node contracts - the shape every syntax tree node satisfies
//!
//! Conformance is structural. Any type that implements [`Node`] is a node,
//! whatever else it carries. [`Parent`] and [`Literal`] refine it with children
//! or a value, and a type may implement both.
//!
//! Concrete variants (headings, paragraphs, text...) belong to downstream
//! crates. They usually model heterogeneous children as an enum and implement
//! the traits by delegation:
//!
//! ```ignore
//! enum Content { Paragraph(Paragraph), Text(Text) }
//!
//! impl Node for Content {
//!     fn node_type(&self) -> &str {
//!         match self {
//!             Content::Paragraph(p) => p.node_type(),
//!             Content::Text(t) => t.node_type(),
//!         }
//!     }
//! }
//! ```
//!
//! [`GenericNode`] covers the other case: tools that read trees without
//! knowing their variants.

use super::data::Data;
use super::error::ShapeError;
use super::position::{Point, Position};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Syntactic unit of a syntax tree
pub trait Node {
    /// The variant of the node, e.g. `"paragraph"`
    fn node_type(&self) -> &str;

    /// Information from the ecosystem
    fn data(&self) -> Option<&Data> {
        None
    }

    /// Location of the node in its source document.
    ///
    /// Must be `None` for generated nodes.
    fn position(&self) -> Option<&Position> {
        None
    }

    /// A node without position was synthesized rather than parsed
    fn is_generated(&self) -> bool {
        self.position().is_none()
    }

    fn start(&self) -> Option<Point> {
        self.position().map(|p| p.start)
    }

    fn end(&self) -> Option<Point> {
        self.position().map(|p| p.end)
    }
}

/// Node containing other nodes, in document order
pub trait Parent: Node {
    type Child: Node;

    fn children(&self) -> &[Self::Child];
    fn children_mut(&mut self) -> &mut Vec<Self::Child>;

    fn child_count(&self) -> usize {
        self.children().len()
    }

    fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}

/// Node containing a value
pub trait Literal: Node {
    type Value;

    fn value(&self) -> &Self::Value;
}

/// Check the shape obligations of a single node: a non-empty type, data without
/// the reserved key, and a well-ordered position.
///
/// Children are not visited.
pub fn validate_node<N: Node + ?Sized>(node: &N) -> Result<(), ShapeError> {
    if node.node_type().is_empty() {
        return Err(ShapeError::EmptyType);
    }
    if let Some(data) = node.data() {
        data.validate()?;
    }
    if let Some(position) = node.position() {
        position.validate()?;
    }
    Ok(())
}

/// A node of any variant, as found in a JSON tree
///
/// Fields specific to a variant (`depth` on a heading, `url` on a link) land in
/// [`fields`](Self::fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericNode {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<GenericNode>>,

    /// `Some(Value::Null)` when the tree says `"value": null`
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,

    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl GenericNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            data: None,
            position: None,
            children: None,
            value: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn parent(node_type: impl Into<String>, children: Vec<GenericNode>) -> Self {
        Self {
            children: Some(children),
            ..Self::new(node_type)
        }
    }

    pub fn literal(node_type: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(node_type)
        }
    }

    /// Attach the source position this node was parsed from
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is_parent(&self) -> bool {
        self.children.is_some()
    }

    pub fn is_literal(&self) -> bool {
        self.value.is_some()
    }

    pub fn literal_value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// [`validate_node`] on this node and every descendant, stopping at the
    /// first violation
    pub fn validate_tree(&self) -> Result<(), ShapeError> {
        validate_node(self)?;
        self.children().iter().try_for_each(GenericNode::validate_tree)
    }
}

impl Node for GenericNode {
    fn node_type(&self) -> &str {
        &self.node_type
    }

    fn data(&self) -> Option<&Data> {
        self.data.as_ref()
    }

    fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }
}

impl Parent for GenericNode {
    type Child = GenericNode;

    fn children(&self) -> &[GenericNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    fn children_mut(&mut self) -> &mut Vec<GenericNode> {
        self.children.get_or_insert_with(Vec::new)
    }
}

/// A present key always yields `Some`, even for `null`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn span(start: (usize, usize, usize), end: (usize, usize, usize)) -> Position {
        Position::new(
            Point::new(start.0, start.1, start.2),
            Point::new(end.0, end.1, end.2),
        )
    }

    // A small downstream vocabulary, the way a markdown crate would define it

    struct Text {
        value: String,
        position: Option<Position>,
    }

    struct Emphasis {
        children: Vec<Phrasing>,
        position: Option<Position>,
    }

    enum Phrasing {
        Text(Text),
        Emphasis(Emphasis),
    }

    struct Root {
        children: Vec<Phrasing>,
    }

    impl Node for Text {
        fn node_type(&self) -> &str {
            "text"
        }
        fn position(&self) -> Option<&Position> {
            self.position.as_ref()
        }
    }

    impl Literal for Text {
        type Value = String;
        fn value(&self) -> &String {
            &self.value
        }
    }

    impl Node for Emphasis {
        fn node_type(&self) -> &str {
            "emphasis"
        }
        fn position(&self) -> Option<&Position> {
            self.position.as_ref()
        }
    }

    impl Parent for Emphasis {
        type Child = Phrasing;
        fn children(&self) -> &[Phrasing] {
            &self.children
        }
        fn children_mut(&mut self) -> &mut Vec<Phrasing> {
            &mut self.children
        }
    }

    impl Node for Phrasing {
        fn node_type(&self) -> &str {
            match self {
                Phrasing::Text(t) => t.node_type(),
                Phrasing::Emphasis(e) => e.node_type(),
            }
        }
        fn position(&self) -> Option<&Position> {
            match self {
                Phrasing::Text(t) => t.position(),
                Phrasing::Emphasis(e) => e.position(),
            }
        }
    }

    impl Node for Root {
        fn node_type(&self) -> &str {
            "root"
        }
    }

    impl Parent for Root {
        type Child = Phrasing;
        fn children(&self) -> &[Phrasing] {
            &self.children
        }
        fn children_mut(&mut self) -> &mut Vec<Phrasing> {
            &mut self.children
        }
    }

    fn sample_root() -> Root {
        Root {
            children: vec![
                Phrasing::Text(Text {
                    value: "a ".to_string(),
                    position: Some(span((1, 1, 0), (1, 3, 2))),
                }),
                Phrasing::Emphasis(Emphasis {
                    children: vec![Phrasing::Text(Text {
                        value: "b".to_string(),
                        position: Some(span((1, 4, 3), (1, 5, 4))),
                    })],
                    position: Some(span((1, 3, 2), (1, 6, 5))),
                }),
            ],
        }
    }

    #[test]
    fn test_downstream_types_conform_structurally() {
        let root = sample_root();

        assert_eq!(root.node_type(), "root");
        assert_eq!(root.child_count(), 2);
        assert!(root.is_generated());

        let types: Vec<&str> = root.children().iter().map(|c| c.node_type()).collect();
        assert_eq!(types, vec!["text", "emphasis"]);

        match &root.children()[1] {
            Phrasing::Emphasis(emphasis) => {
                assert!(emphasis.has_children());
                assert_eq!(emphasis.start(), Some(Point::new(1, 3, 2)));
                match &emphasis.children()[0] {
                    Phrasing::Text(text) => assert_eq!(text.value(), "b"),
                    Phrasing::Emphasis(_) => panic!("expected text"),
                }
            }
            Phrasing::Text(_) => panic!("expected emphasis"),
        }
    }

    #[test]
    fn test_children_mut_keeps_document_order() {
        let mut root = sample_root();
        root.children_mut().push(Phrasing::Text(Text {
            value: "c".to_string(),
            position: None,
        }));

        let last = root.children().last().unwrap();
        assert_eq!(last.node_type(), "text");
        assert!(last.is_generated());
        assert_eq!(last.end(), None);
    }

    #[test]
    fn test_validate_node() {
        assert!(validate_node(&GenericNode::new("text")).is_ok());
        assert_eq!(
            validate_node(&GenericNode::new("")),
            Err(ShapeError::EmptyType)
        );

        let backwards = GenericNode::new("text").at(span((2, 1, 10), (1, 1, 0)));
        assert!(matches!(
            validate_node(&backwards),
            Err(ShapeError::StartAfterEnd { .. })
        ));

        let reserved: Data = serde_json::from_value(json!({"space": 1})).unwrap();
        let spaced = GenericNode::new("text").with_data(reserved);
        assert_eq!(
            validate_node(&spaced),
            Err(ShapeError::ReservedDataKey("space".to_string()))
        );
    }

    #[test]
    fn test_validate_tree_visits_descendants() {
        let tree = GenericNode::parent(
            "root",
            vec![GenericNode::parent(
                "paragraph",
                vec![GenericNode::literal("text", "hi").at(span((1, 1, 0), (1, 3, 2)))],
            )],
        );
        assert!(tree.validate_tree().is_ok());

        let deep = GenericNode::parent(
            "root",
            vec![GenericNode::parent("paragraph", vec![GenericNode::new("")])],
        );
        assert!(validate_node(&deep).is_ok());
        assert_eq!(deep.validate_tree(), Err(ShapeError::EmptyType));
    }

    #[test]
    fn test_validate_node_through_trait_object() {
        let text = Text {
            value: "x".to_string(),
            position: Some(span((1, 1, 0), (1, 2, 1))),
        };
        let node: &dyn Node = &text;
        assert!(validate_node(node).is_ok());
    }

    #[test]
    fn test_generic_node_from_json() {
        let node: GenericNode = serde_json::from_value(json!({
            "type": "heading",
            "depth": 2,
            "children": [
                {"type": "text", "value": "Title"}
            ],
            "position": {
                "start": {"line": 1, "column": 1, "offset": 0},
                "end": {"line": 1, "column": 9, "offset": 8}
            }
        }))
        .unwrap();

        assert_eq!(node.node_type(), "heading");
        assert_eq!(node.fields.get("depth"), Some(&json!(2)));
        assert!(node.is_parent());
        assert!(!node.is_literal());
        assert!(!node.is_generated());
        assert_eq!(node.children()[0].literal_value(), Some(&json!("Title")));
    }

    #[test]
    fn test_generic_node_null_value_is_present() {
        let node: GenericNode =
            serde_json::from_value(json!({"type": "raw", "value": null})).unwrap();
        assert!(node.is_literal());
        assert_eq!(node.literal_value(), Some(&Value::Null));

        let absent: GenericNode = serde_json::from_value(json!({"type": "raw"})).unwrap();
        assert!(!absent.is_literal());
    }

    #[test]
    fn test_generic_node_serializes_without_absent_fields() {
        let node = GenericNode::parent(
            "root",
            vec![GenericNode::literal("text", "hi").with_field("lang", "en")],
        );

        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "type": "root",
                "children": [{"type": "text", "value": "hi", "lang": "en"}]
            })
        );
    }

    #[test]
    fn test_generic_children_mut_creates_children() {
        let mut node = GenericNode::new("root");
        assert!(node.children().is_empty());
        node.children_mut().push(GenericNode::literal("text", "x"));
        assert!(node.is_parent());
        assert_eq!(node.child_count(), 1);
    }
}
