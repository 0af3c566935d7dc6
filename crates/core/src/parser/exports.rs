use serde_json::{Map, Value};
use tree_sitter::{Node, Tree};

use super::literal::LiteralEvaluator;

/// Statically known exports of one source module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleExports {
    /// `export default ...` or `module.exports = ...`
    pub default: Option<Value>,
    /// `export const name = ...` and `export { name }`
    pub named: Map<String, Value>,
}

impl ModuleExports {
    /// Merge into a single module value: the default export object, with
    /// named literal exports filling in fields it does not define.
    pub fn into_module_value(self) -> Option<Value> {
        let mut merged = match self.default {
            Some(Value::Object(map)) => map,
            _ if self.named.is_empty() => return None,
            _ => Map::new(),
        };
        for (name, value) in self.named {
            if value.is_null() {
                continue;
            }
            merged.entry(name).or_insert(value);
        }
        Some(Value::Object(merged))
    }
}

/// Collect the exports of a parsed module
pub fn extract_exports(tree: &Tree, source: &str) -> ModuleExports {
    let (exports, _) = walk_program(tree, source);
    exports
}

/// Find a class field initializer such as `description = { ... }` anywhere in
/// the module and evaluate it.
pub fn find_class_field(tree: &Tree, source: &str, field: &str) -> Option<Value> {
    let (_, evaluator) = walk_program(tree, source);
    let node = find_field_node(tree.root_node(), &evaluator, field)?;
    match evaluator.eval(node) {
        Value::Null => None,
        value => Some(value),
    }
}

fn walk_program<'s>(tree: &Tree, source: &'s str) -> (ModuleExports, LiteralEvaluator<'s>) {
    let mut evaluator = LiteralEvaluator::new(source);
    let mut exports = ModuleExports::default();
    let root = tree.root_node();
    let mut cursor = root.walk();

    for statement in root.named_children(&mut cursor) {
        match statement.kind() {
            "lexical_declaration" | "variable_declaration" => {
                bind_declarators(statement, &mut evaluator, None);
            }
            "export_statement" => collect_export(statement, &mut evaluator, &mut exports),
            "expression_statement" => {
                if let Some(value) = commonjs_export(statement, &evaluator) {
                    exports.default = Some(value);
                }
            }
            _ => {}
        }
    }

    (exports, evaluator)
}

fn bind_declarators(
    declaration: Node,
    evaluator: &mut LiteralEvaluator,
    mut exported: Option<&mut Map<String, Value>>,
) {
    let mut cursor = declaration.walk();
    for declarator in declaration.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };
        if name_node.kind() != "identifier" {
            continue;
        }
        let name = evaluator.text(name_node).to_string();
        let value = declarator
            .child_by_field_name("value")
            .map(|value| evaluator.eval(value))
            .unwrap_or(Value::Null);
        if let Some(named) = exported.as_deref_mut() {
            named.insert(name.clone(), value.clone());
        }
        evaluator.bind(name, value);
    }
}

fn collect_export(statement: Node, evaluator: &mut LiteralEvaluator, exports: &mut ModuleExports) {
    if let Some(declaration) = statement.child_by_field_name("declaration") {
        if matches!(
            declaration.kind(),
            "lexical_declaration" | "variable_declaration"
        ) {
            bind_declarators(declaration, evaluator, Some(&mut exports.named));
        }
        return;
    }

    let mut cursor = statement.walk();
    let is_default = statement
        .children(&mut cursor)
        .any(|child| child.kind() == "default");
    if is_default {
        if let Some(value) = statement.child_by_field_name("value") {
            exports.default = Some(evaluator.eval(value));
        }
        return;
    }

    // export { a, b as c }
    let mut cursor = statement.walk();
    for clause in statement.named_children(&mut cursor) {
        if clause.kind() != "export_clause" {
            continue;
        }
        let mut inner = clause.walk();
        for specifier in clause.named_children(&mut inner) {
            let Some(name_node) = specifier.child_by_field_name("name") else {
                continue;
            };
            let local = evaluator.text(name_node);
            let exported_as = specifier
                .child_by_field_name("alias")
                .map(|alias| evaluator.text(alias))
                .unwrap_or(local);
            let value = evaluator.binding(local).cloned().unwrap_or(Value::Null);
            if exported_as == "default" {
                exports.default = Some(value);
            } else {
                exports.named.insert(exported_as.to_string(), value);
            }
        }
    }
}

fn commonjs_export(statement: Node, evaluator: &LiteralEvaluator) -> Option<Value> {
    let expression = statement.named_child(0)?;
    if expression.kind() != "assignment_expression" {
        return None;
    }
    let left = expression.child_by_field_name("left")?;
    if evaluator.text(left) != "module.exports" {
        return None;
    }
    let right = expression.child_by_field_name("right")?;
    Some(evaluator.eval(right))
}

fn find_field_node<'t>(node: Node<'t>, evaluator: &LiteralEvaluator, field: &str) -> Option<Node<'t>> {
    if node.kind() == "public_field_definition" {
        let name_matches = node
            .child_by_field_name("name")
            .is_some_and(|name| evaluator.text(name) == field);
        if name_matches {
            if let Some(value) = node.child_by_field_name("value") {
                return Some(value);
            }
        }
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(|child| find_field_node(child, evaluator, field))
}
