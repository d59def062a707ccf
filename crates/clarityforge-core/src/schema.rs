//! Response schema for [`ClarityAnalysis`](crate::model::ClarityAnalysis).
//!
//! One typed tree serves three purposes: it is declared to the model in
//! Gemini's OpenAPI dialect or as plain JSON Schema, and it validates the
//! JSON that comes back before anything is deserialized.

use serde_json::{json, Map, Value};

use crate::error::SchemaError;

/// A node in the response schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object {
        properties: Vec<Property>,
        required: Vec<&'static str>,
    },
    Array(Box<SchemaNode>),
    String,
    Number,
}

/// A named member of an object node.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub node: SchemaNode,
}

impl Property {
    fn new(name: &'static str, node: SchemaNode) -> Self {
        Self {
            name,
            description: None,
            node,
        }
    }

    fn described(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Schema dialect understood by a model backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    /// Gemini `responseSchema` (OpenAPI subset, upper-case type names).
    Gemini,
    /// Standard JSON Schema, strict enough for OpenAI structured outputs.
    JsonSchema,
}

/// The schema the remote model must answer with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    root: SchemaNode,
}

/// Shorthand for an object whose every property is required.
fn strict_object(properties: Vec<Property>) -> SchemaNode {
    let required = properties.iter().map(|p| p.name).collect();
    SchemaNode::Object {
        properties,
        required,
    }
}

impl ResponseSchema {
    pub fn new(root: SchemaNode) -> Self {
        Self { root }
    }

    /// The `ClarityAnalysis` shape with every field required.
    pub fn clarity_analysis() -> Self {
        let missing_concept = strict_object(vec![
            Property::new("name", SchemaNode::String),
            Property::new("reason", SchemaNode::String),
            Property::new("dependencyChain", SchemaNode::String),
        ]);
        let logical_gap = strict_object(vec![
            Property::new("gap", SchemaNode::String),
            Property::new("evidence", SchemaNode::String),
        ]);
        let comparison_point = strict_object(vec![
            Property::new("aspect", SchemaNode::String),
            Property::new("before", SchemaNode::String),
            Property::new("after", SchemaNode::String),
        ]);
        let improvement_tip = strict_object(vec![
            Property::new("tip", SchemaNode::String),
            Property::new("thinkingPattern", SchemaNode::String),
        ]);

        Self::new(strict_object(vec![
            Property::new("score", SchemaNode::Number)
                .described("Understanding depth score (0-100)"),
            Property::new("scoreReasoning", SchemaNode::String)
                .described("Brief justification for the score"),
            Property::new("missingConcepts", SchemaNode::Array(Box::new(missing_concept))),
            Property::new("logicalGaps", SchemaNode::Array(Box::new(logical_gap))),
            Property::new("reconstructedExplanation", SchemaNode::String)
                .described("Markdown explanation rebuilt from fundamentals"),
            Property::new("comparison", SchemaNode::Array(Box::new(comparison_point))),
            Property::new("improvementTips", SchemaNode::Array(Box::new(improvement_tip))),
        ]))
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Render the schema in the given wire dialect.
    pub fn render(&self, dialect: SchemaDialect) -> Value {
        render_node(&self.root, None, dialect)
    }

    /// Check `value` against the schema, reporting the first violation.
    ///
    /// Unknown members are tolerated; only declared structure is enforced.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        validate_node(&self.root, value, "$")
    }
}

fn render_node(node: &SchemaNode, description: Option<&str>, dialect: SchemaDialect) -> Value {
    let type_name = |gemini: &str, standard: &str| match dialect {
        SchemaDialect::Gemini => gemini.to_string(),
        SchemaDialect::JsonSchema => standard.to_string(),
    };

    let mut out = Map::new();
    match node {
        SchemaNode::Object {
            properties,
            required,
        } => {
            out.insert("type".into(), json!(type_name("OBJECT", "object")));
            let mut props = Map::new();
            for p in properties {
                props.insert(p.name.into(), render_node(&p.node, p.description, dialect));
            }
            out.insert("properties".into(), Value::Object(props));
            out.insert("required".into(), json!(required));
            match dialect {
                SchemaDialect::Gemini => {
                    let order: Vec<&str> = properties.iter().map(|p| p.name).collect();
                    out.insert("propertyOrdering".into(), json!(order));
                }
                SchemaDialect::JsonSchema => {
                    out.insert("additionalProperties".into(), json!(false));
                }
            }
        }
        SchemaNode::Array(items) => {
            out.insert("type".into(), json!(type_name("ARRAY", "array")));
            out.insert("items".into(), render_node(items, None, dialect));
        }
        SchemaNode::String => {
            out.insert("type".into(), json!(type_name("STRING", "string")));
        }
        SchemaNode::Number => {
            out.insert("type".into(), json!(type_name("NUMBER", "number")));
        }
    }
    if let Some(d) = description {
        out.insert("description".into(), json!(d));
    }
    Value::Object(out)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn validate_node(node: &SchemaNode, value: &Value, path: &str) -> Result<(), SchemaError> {
    let wrong_type = |expected: &'static str| SchemaError::WrongType {
        path: path.to_string(),
        expected,
        found: json_type_name(value),
    };

    match node {
        SchemaNode::Object {
            properties,
            required,
        } => {
            let object = value.as_object().ok_or_else(|| wrong_type("an object"))?;
            for p in properties {
                let child_path = format!("{path}.{}", p.name);
                match object.get(p.name) {
                    Some(child) => validate_node(&p.node, child, &child_path)?,
                    None if required.contains(&p.name) => {
                        return Err(SchemaError::MissingField { path: child_path })
                    }
                    None => {}
                }
            }
            Ok(())
        }
        SchemaNode::Array(items) => {
            let array = value.as_array().ok_or_else(|| wrong_type("an array"))?;
            for (i, item) in array.iter().enumerate() {
                validate_node(items, item, &format!("{path}[{i}]"))?;
            }
            Ok(())
        }
        SchemaNode::String if value.is_string() => Ok(()),
        SchemaNode::String => Err(wrong_type("a string")),
        SchemaNode::Number if value.is_number() => Ok(()),
        SchemaNode::Number => Err(wrong_type("a number")),
    }
}
