//! Template variable inference.
//!
//! Walks a parsed template and answers one question per free variable: is it
//! used as a plain scalar, as a record with named fields, or as a collection
//! of records iterated by a loop? The answer drives the shape of the TOML
//! skeleton handed to the user for editing.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::ast::{Expr, Node, Template};

/// Classification of every free variable in one template body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// Every top-level name read anywhere without a local binding, sorted.
    pub free: BTreeSet<String>,
    /// Iterable name -> attributes read on its loop-bound elements.
    pub list_fields: BTreeMap<String, BTreeSet<String>>,
    /// Free name -> attributes read on it outside any loop binding.
    pub nested_fields: BTreeMap<String, BTreeSet<String>>,
}

/// Classify every free variable of a parsed template.
pub fn inspect(template: &Template) -> Inspection {
    let mut inspector = Inspector::default();
    inspector.visit_nodes(template);
    Inspection {
        free: inspector.free,
        list_fields: inspector.list_fields,
        nested_fields: inspector.nested_fields,
    }
}

/// Tree visitor carrying two parallel stacks: lexical scopes (names bound by
/// enclosing loops, plus the implicit `loop` name) and loop bindings (target
/// names paired with the iterable's name when the iterable was a bare name).
#[derive(Default)]
struct Inspector {
    free: BTreeSet<String>,
    list_fields: BTreeMap<String, BTreeSet<String>>,
    nested_fields: BTreeMap<String, BTreeSet<String>>,
    scope_stack: Vec<HashSet<String>>,
    loop_stack: Vec<(HashSet<String>, Option<String>)>,
}

impl Inspector {
    fn visit_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.visit_node(node);
        }
    }

    fn visit_node(&mut self, node: &Node) {
        match node {
            Node::Text(_) => {}
            Node::Output(expr) => self.visit_expr(expr, true),
            Node::For {
                targets,
                iter,
                body,
                else_body,
            } => {
                // The iterable is read in the enclosing scope. It contributes
                // to the free set, but accesses inside it carry no field
                // signal for classification.
                self.visit_expr(iter, false);

                let target_names: HashSet<String> = targets.iter().cloned().collect();
                let iter_name = match iter {
                    Expr::Name(name) => Some(name.clone()),
                    _ => None,
                };

                let mut scope = target_names.clone();
                scope.insert("loop".to_string());

                self.loop_stack.push((target_names, iter_name));
                self.scope_stack.push(scope);

                self.visit_nodes(body);

                self.scope_stack.pop();
                self.loop_stack.pop();

                self.visit_nodes(else_body);
            }
            Node::If { cases, else_body } => {
                for (condition, body) in cases {
                    self.visit_expr(condition, true);
                    self.visit_nodes(body);
                }
                if let Some(body) = else_body {
                    self.visit_nodes(body);
                }
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr, classify: bool) {
        match expr {
            Expr::Str(_) | Expr::Int(_) | Expr::Bool(_) => {}
            Expr::Name(name) => {
                if !self.is_local(name) {
                    self.free.insert(name.clone());
                }
            }
            Expr::Attr(base, _) => {
                if classify {
                    self.register_access(expr);
                }
                self.visit_expr(base, classify);
            }
            Expr::Index(base, key) => {
                if classify {
                    self.register_access(expr);
                }
                self.visit_expr(base, classify);
                self.visit_expr(key, classify);
            }
            Expr::BinOp(lhs, _, rhs) => {
                self.visit_expr(lhs, classify);
                self.visit_expr(rhs, classify);
            }
        }
    }

    /// Record the field-usage signal of one attribute/index access. Only the
    /// first attribute after the base name matters for classification.
    fn register_access(&mut self, expr: &Expr) {
        let parts = flatten_access(expr);
        if parts.len() < 2 {
            return;
        }

        let base = &parts[0];
        let attr = parts[1].clone();

        if self.is_local(base) {
            if let Some(iter_name) = self.loop_iter_for_local(base) {
                self.list_fields.entry(iter_name).or_default().insert(attr);
            }
        } else {
            self.nested_fields
                .entry(base.clone())
                .or_default()
                .insert(attr);
        }
    }

    fn is_local(&self, name: &str) -> bool {
        self.scope_stack.iter().rev().any(|scope| scope.contains(name))
    }

    /// Iterable name of the innermost loop binding this name, if that loop's
    /// iterable was a bare name reference.
    fn loop_iter_for_local(&self, name: &str) -> Option<String> {
        for (targets, iter_name) in self.loop_stack.iter().rev() {
            if targets.contains(name) {
                return iter_name.clone();
            }
        }
        None
    }
}

/// Flatten a chained attribute/index expression into a root-to-leaf dotted
/// path. Index segments count only when the key is a string literal; anything
/// else aborts the walk. The walk succeeds only if it bottoms out at a name.
fn flatten_access(expr: &Expr) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = expr;

    loop {
        match current {
            Expr::Attr(base, attr) => {
                parts.push(attr.clone());
                current = base;
            }
            Expr::Index(base, key) => {
                match key.as_ref() {
                    Expr::Str(key) => parts.push(key.clone()),
                    _ => break,
                }
                current = base;
            }
            _ => break,
        }
    }

    if let Expr::Name(name) = current {
        parts.push(name.clone());
        parts.reverse();
        parts
    } else {
        Vec::new()
    }
}
