//! Strict template evaluation.
//!
//! Every name lookup, attribute access, and key access must resolve against
//! the supplied context; anything missing is an error rather than an empty
//! string. This keeps half-filled variable documents from silently producing
//! broken output.

use std::collections::{BTreeMap, HashMap};

use super::ast::{BinOp, Expr, Node, Template};

/// A runtime value. Mirrors the shapes a TOML context can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<Value>),
    Table(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::Array(a) => !a.is_empty(),
            Value::Table(t) => !t.is_empty(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }
}

impl From<&toml::Value> for Value {
    fn from(value: &toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::Str(s.clone()),
            toml::Value::Integer(n) => Value::Int(*n),
            toml::Value::Float(f) => Value::Float(*f),
            toml::Value::Boolean(b) => Value::Bool(*b),
            toml::Value::Datetime(d) => Value::Str(d.to_string()),
            toml::Value::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            toml::Value::Table(table) => Value::Table(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Build an evaluation context from a TOML table.
pub fn context_from_toml(table: &toml::Table) -> HashMap<String, Value> {
    table
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v)))
        .collect()
}

/// Tree-walking evaluator with a scope stack; loops push one scope per
/// iteration for their target bindings and the `loop` metadata table.
pub struct Evaluator {
    scopes: Vec<HashMap<String, Value>>,
}

impl Evaluator {
    pub fn new(context: HashMap<String, Value>) -> Self {
        Self {
            scopes: vec![context],
        }
    }

    fn get_var(&self, name: &str) -> Option<Value> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value.clone());
            }
        }
        None
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn set_local(&mut self, name: String, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, value);
        }
    }

    pub fn render(&mut self, template: &Template) -> Result<String, String> {
        let mut output = String::new();
        for node in template {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Output(expr) => {
                    let value = self.eval_expr(expr)?;
                    match value {
                        Value::Str(s) => output.push_str(&s),
                        Value::Int(n) => output.push_str(&n.to_string()),
                        Value::Float(f) => output.push_str(&f.to_string()),
                        Value::Bool(b) => output.push_str(if b { "true" } else { "false" }),
                        other => {
                            return Err(format!("cannot render {} value directly", other.type_name()))
                        }
                    }
                }
                Node::For {
                    targets,
                    iter,
                    body,
                    else_body,
                } => {
                    let iter_value = self.eval_expr(iter)?;
                    let items = match iter_value {
                        Value::Array(items) => items,
                        other => {
                            return Err(format!("cannot iterate over {} value", other.type_name()))
                        }
                    };
                    if items.is_empty() {
                        output.push_str(&self.render(else_body)?);
                        continue;
                    }
                    let len = items.len();
                    for (i, item) in items.into_iter().enumerate() {
                        self.push_scope();
                        self.bind_targets(targets, item)?;

                        let mut meta = BTreeMap::new();
                        meta.insert("index".to_string(), Value::Int(i as i64 + 1));
                        meta.insert("index0".to_string(), Value::Int(i as i64));
                        meta.insert("first".to_string(), Value::Bool(i == 0));
                        meta.insert("last".to_string(), Value::Bool(i == len - 1));
                        self.set_local("loop".to_string(), Value::Table(meta));

                        let rendered = self.render(body);
                        self.pop_scope();
                        output.push_str(&rendered?);
                    }
                }
                Node::If { cases, else_body } => {
                    let mut matched = false;
                    for (condition, body) in cases {
                        if self.eval_expr(condition)?.is_truthy() {
                            output.push_str(&self.render(body)?);
                            matched = true;
                            break;
                        }
                    }
                    if !matched {
                        if let Some(body) = else_body {
                            output.push_str(&self.render(body)?);
                        }
                    }
                }
            }
        }
        Ok(output)
    }

    fn bind_targets(&mut self, targets: &[String], item: Value) -> Result<(), String> {
        if let [single] = targets {
            self.set_local(single.clone(), item);
            return Ok(());
        }
        match item {
            Value::Array(parts) if parts.len() == targets.len() => {
                for (name, part) in targets.iter().zip(parts) {
                    self.set_local(name.clone(), part);
                }
                Ok(())
            }
            Value::Array(parts) => Err(format!(
                "cannot unpack array of {} into {} loop targets",
                parts.len(),
                targets.len()
            )),
            other => Err(format!(
                "cannot unpack {} value into {} loop targets",
                other.type_name(),
                targets.len()
            )),
        }
    }

    fn eval_expr(&self, expr: &Expr) -> Result<Value, String> {
        match expr {
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Name(name) => self
                .get_var(name)
                .ok_or_else(|| format!("'{}' is undefined", name)),
            Expr::Attr(base, attr) => {
                let value = self.eval_expr(base)?;
                match value {
                    Value::Table(table) => table
                        .get(attr)
                        .cloned()
                        .ok_or_else(|| format!("table has no attribute '{}'", attr)),
                    other => Err(format!(
                        "cannot read attribute '{}' of {} value",
                        attr,
                        other.type_name()
                    )),
                }
            }
            Expr::Index(base, key) => {
                let value = self.eval_expr(base)?;
                let key_value = self.eval_expr(key)?;
                match (value, key_value) {
                    (Value::Table(table), Value::Str(key)) => table
                        .get(&key)
                        .cloned()
                        .ok_or_else(|| format!("table has no key '{}'", key)),
                    (Value::Array(items), Value::Int(i)) => {
                        if i < 0 || i >= items.len() as i64 {
                            return Err(format!(
                                "index {} out of bounds (length {})",
                                i,
                                items.len()
                            ));
                        }
                        Ok(items[i as usize].clone())
                    }
                    (base_value, key_value) => Err(format!(
                        "cannot index {} value with {} key",
                        base_value.type_name(),
                        key_value.type_name()
                    )),
                }
            }
            Expr::BinOp(lhs, op, rhs) => {
                let left = self.eval_expr(lhs)?;
                let right = self.eval_expr(rhs)?;
                match op {
                    BinOp::Eq => Ok(Value::Bool(left == right)),
                    BinOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
                    BinOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
                    BinOp::Add => match (left, right) {
                        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
                        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
                        (a, b) => Err(format!(
                            "cannot add {} and {} values",
                            a.type_name(),
                            b.type_name()
                        )),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse;
    use super::*;

    fn render(source: &str, context: &str) -> Result<String, String> {
        let table: toml::Table = toml::from_str(context).expect("test context parses");
        let template = parse(source).expect("test template parses");
        Evaluator::new(context_from_toml(&table)).render(&template)
    }

    #[test]
    fn renders_scalars() {
        let out = render("Hello {{ name }}, {{ count }}!", "name = 'x'\ncount = 3").unwrap();
        assert_eq!(out, "Hello x, 3!");
    }

    #[test]
    fn undefined_name_is_error() {
        let err = render("{{ missing }}", "").unwrap_err();
        assert!(err.contains("'missing' is undefined"), "got: {}", err);
    }

    #[test]
    fn missing_nested_attribute_is_error() {
        let err = render("{{ user.email }}", "[user]\nname = 'a'").unwrap_err();
        assert!(err.contains("no attribute 'email'"), "got: {}", err);
    }

    #[test]
    fn nested_attribute_resolves() {
        let out = render("{{ user.email }}", "[user]\nemail = 'a@b.com'").unwrap();
        assert_eq!(out, "a@b.com");
    }

    #[test]
    fn indexed_access_with_string_key() {
        let out = render("{{ user['email'] }}", "[user]\nemail = 'a@b.com'").unwrap();
        assert_eq!(out, "a@b.com");
    }

    #[test]
    fn loop_over_array_of_tables() {
        let out = render(
            "{% for item in items %}{{ item.name }}-{{ item.qty }};{% endfor %}",
            "[[items]]\nname = 'a'\nqty = 1\n[[items]]\nname = 'b'\nqty = 2",
        )
        .unwrap();
        assert_eq!(out, "a-1;b-2;");
    }

    #[test]
    fn loop_metadata() {
        let out = render(
            "{% for x in xs %}{{ loop.index }}{% if loop.last %}.{% endif %}{% endfor %}",
            "xs = ['a', 'b', 'c']",
        )
        .unwrap();
        assert_eq!(out, "123.");
    }

    #[test]
    fn loop_else_runs_on_empty_iterable() {
        let out = render("{% for x in xs %}{{ x }}{% else %}none{% endfor %}", "xs = []").unwrap();
        assert_eq!(out, "none");
    }

    #[test]
    fn loop_target_shadows_global() {
        let out = render(
            "{% for x in xs %}{{ x }}{% endfor %}{{ x }}",
            "x = 'global'\nxs = ['local']",
        )
        .unwrap();
        assert_eq!(out, "localglobal");
    }

    #[test]
    fn tuple_unpacking() {
        let out = render(
            "{% for k, v in pairs %}{{ k }}={{ v }};{% endfor %}",
            "pairs = [['a', 1], ['b', 2]]",
        )
        .unwrap();
        assert_eq!(out, "a=1;b=2;");
    }

    #[test]
    fn tuple_unpacking_arity_mismatch_is_error() {
        let err = render(
            "{% for a, b in pairs %}x{% endfor %}",
            "pairs = [['only']]",
        )
        .unwrap_err();
        assert!(err.contains("unpack"), "got: {}", err);
    }

    #[test]
    fn iterating_non_array_is_error() {
        let err = render("{% for x in name %}y{% endfor %}", "name = 'scalar'").unwrap_err();
        assert!(err.contains("iterate"), "got: {}", err);
    }

    #[test]
    fn missing_iterable_is_error() {
        let err = render("{% for x in xs %}y{% endfor %}", "").unwrap_err();
        assert!(err.contains("'xs' is undefined"), "got: {}", err);
    }

    #[test]
    fn if_branches() {
        let ctx = "a = false\nb = true";
        let out = render("{% if a %}1{% elif b %}2{% else %}3{% endif %}", ctx).unwrap();
        assert_eq!(out, "2");
    }

    #[test]
    fn string_concatenation() {
        let out = render("{{ a + '-' + b }}", "a = 'x'\nb = 'y'").unwrap();
        assert_eq!(out, "x-y");
    }

    #[test]
    fn equality_comparison() {
        let out = render("{% if mode == 'dev' %}yes{% endif %}", "mode = 'dev'").unwrap();
        assert_eq!(out, "yes");
    }

    #[test]
    fn array_index_out_of_bounds_is_error() {
        let err = render("{{ xs[3] }}", "xs = ['a']").unwrap_err();
        assert!(err.contains("out of bounds"), "got: {}", err);
    }

    #[test]
    fn rendering_table_directly_is_error() {
        let err = render("{{ user }}", "[user]\nname = 'a'").unwrap_err();
        assert!(err.contains("cannot render"), "got: {}", err);
    }
}
