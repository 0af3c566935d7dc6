//! Static evaluation of literal expressions into JSON values.
//!
//! Element modules describe themselves with plain object literals. Only the
//! literal subset of the language is understood; any other expression
//! evaluates to `null`.

use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use tree_sitter::Node;

/// Evaluates expression nodes against the module's top-level `const` bindings
pub struct LiteralEvaluator<'s> {
    source: &'s str,
    bindings: HashMap<String, Value>,
}

impl<'s> LiteralEvaluator<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    pub fn eval(&self, node: Node) -> Value {
        match node.kind() {
            "object" => Value::Object(self.eval_object(node)),
            "array" => self.eval_array(node),
            "string" => Value::String(self.eval_string(node)),
            "template_string" => self.eval_template(node),
            "number" => parse_number(self.text(node)),
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "null" | "undefined" => Value::Null,
            "identifier" => self.bindings.get(self.text(node)).cloned().unwrap_or(Value::Null),
            "unary_expression" => self.eval_unary(node),
            "as_expression" | "satisfies_expression" | "parenthesized_expression"
            | "non_null_expression" | "type_assertion" => self.eval_first_expression(node),
            "call_expression" => self.eval_call(node),
            _ => Value::Null,
        }
    }

    fn eval_object(&self, node: Node) -> Map<String, Value> {
        let mut map = Map::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "pair" => {
                    let (Some(key_node), Some(value_node)) = (
                        child.child_by_field_name("key"),
                        child.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    if let Some(key) = self.property_key(key_node) {
                        map.insert(key, self.eval(value_node));
                    }
                }
                "shorthand_property_identifier" => {
                    let name = self.text(child);
                    let value = self.bindings.get(name).cloned().unwrap_or(Value::Null);
                    map.insert(name.to_string(), value);
                }
                "spread_element" => {
                    if let Some(Value::Object(spread)) =
                        child.named_child(0).map(|inner| self.eval(inner))
                    {
                        map.extend(spread);
                    }
                }
                // Methods and getters carry no metadata
                _ => {}
            }
        }
        map
    }

    fn property_key(&self, node: Node) -> Option<String> {
        match node.kind() {
            "property_identifier" => Some(self.text(node).to_string()),
            "string" => Some(self.eval_string(node)),
            "number" => Some(self.text(node).to_string()),
            _ => None,
        }
    }

    fn eval_array(&self, node: Node) -> Value {
        let mut items = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "spread_element" {
                if let Some(Value::Array(spread)) =
                    child.named_child(0).map(|inner| self.eval(inner))
                {
                    items.extend(spread);
                }
                continue;
            }
            if child.kind() == "comment" {
                continue;
            }
            items.push(self.eval(child));
        }
        Value::Array(items)
    }

    fn eval_string(&self, node: Node) -> String {
        let mut out = String::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "string_fragment" => out.push_str(self.text(child)),
                "escape_sequence" => out.push_str(&unescape(self.text(child))),
                _ => {}
            }
        }
        out
    }

    fn eval_template(&self, node: Node) -> Value {
        let mut cursor = node.walk();
        let has_substitution = node
            .named_children(&mut cursor)
            .any(|child| child.kind() == "template_substitution");
        if has_substitution {
            return Value::Null;
        }
        let raw = self.text(node);
        let inner = raw
            .strip_prefix('`')
            .and_then(|s| s.strip_suffix('`'))
            .unwrap_or(raw);
        Value::String(unescape_all(inner))
    }

    fn eval_unary(&self, node: Node) -> Value {
        let operator = node
            .child_by_field_name("operator")
            .map(|op| self.text(op))
            .unwrap_or("");
        let argument = node
            .child_by_field_name("argument")
            .map(|arg| self.eval(arg))
            .unwrap_or(Value::Null);
        match (operator, argument) {
            ("-", Value::Number(n)) => negate(&n),
            ("!", Value::Bool(b)) => Value::Bool(!b),
            _ => Value::Null,
        }
    }

    fn eval_first_expression(&self, node: Node) -> Value {
        node.named_child(0)
            .map(|inner| self.eval(inner))
            .unwrap_or(Value::Null)
    }

    /// `defineAction({ ... })` style wrappers evaluate to their object argument
    fn eval_call(&self, node: Node) -> Value {
        let Some(arguments) = node.child_by_field_name("arguments") else {
            return Value::Null;
        };
        let mut cursor = arguments.walk();
        let first = arguments
            .named_children(&mut cursor)
            .find(|arg| arg.kind() != "comment");
        match first.map(|arg| self.eval(arg)) {
            Some(value @ Value::Object(_)) => value,
            _ => Value::Null,
        }
    }
}

fn parse_number(text: &str) -> Value {
    let cleaned = text.replace('_', "");
    if let Ok(int) = cleaned.parse::<i64>() {
        return Value::Number(int.into());
    }
    cleaned
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn negate(n: &Number) -> Value {
    if let Some(int) = n.as_i64() {
        return Value::Number((-int).into());
    }
    n.as_f64()
        .and_then(|f| Number::from_f64(-f))
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn unescape(sequence: &str) -> String {
    let body = sequence.strip_prefix('\\').unwrap_or(sequence);
    match body {
        "n" => "\n".to_string(),
        "t" => "\t".to_string(),
        "r" => "\r".to_string(),
        "b" => "\u{8}".to_string(),
        "v" => "\u{b}".to_string(),
        "f" => "\u{c}".to_string(),
        "0" => "\0".to_string(),
        _ if body.len() > 1 && (body.starts_with('x') || body.starts_with('u')) => {
            let hex = body[1..].trim_start_matches('{').trim_end_matches('}');
            u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        }
        // \" \' \\ and line continuations keep the escaped character
        _ => body.trim_start_matches(['\n', '\r']).to_string(),
    }
}

/// Decode every escape sequence in raw template text
fn unescape_all(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(kind) = chars.next() else {
            break;
        };
        let mut sequence = String::from('\\');
        sequence.push(kind);
        match kind {
            'x' => sequence.extend(chars.by_ref().take(2)),
            'u' if chars.peek() == Some(&'{') => {
                for next in chars.by_ref() {
                    sequence.push(next);
                    if next == '}' {
                        break;
                    }
                }
            }
            'u' => sequence.extend(chars.by_ref().take(4)),
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
            }
            _ => {}
        }
        out.push_str(&unescape(&sequence));
    }
    out
}
