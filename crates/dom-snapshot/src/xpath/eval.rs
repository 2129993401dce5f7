use tracing::trace;

use crate::errors::DomError;
use crate::model::{Document, NodeId, NodeKind};

use super::{Axis, CmpOp, Expr, Function, NodeTest, Step, XPathExpr};

/// Result of evaluating a predicate sub-expression.
///
/// Node-sets are carried as the string-values of their members, which is all
/// comparisons, conversions and the supported functions need.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    NodeSet(Vec<String>),
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Value {
    pub fn to_bool(&self) -> bool {
        match self {
            Value::NodeSet(items) => !items.is_empty(),
            Value::Str(s) => !s.is_empty(),
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Bool(b) => *b,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Value::NodeSet(items) => items.first().cloned().unwrap_or_default(),
            Value::Str(s) => s.clone(),
            Value::Num(n) => number_to_text(*n),
            Value::Bool(b) => b.to_string(),
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Num(n) => *n,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            other => text_to_number(&other.to_text()),
        }
    }
}

fn number_to_text(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_finite() && n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn text_to_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

impl CmpOp {
    fn flip(self) -> Self {
        match self {
            CmpOp::Lt => CmpOp::Gt,
            CmpOp::Le => CmpOp::Ge,
            CmpOp::Gt => CmpOp::Lt,
            CmpOp::Ge => CmpOp::Le,
            other => other,
        }
    }
}

fn compare_numbers(op: CmpOp, a: f64, b: f64) -> bool {
    match op {
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
        CmpOp::Lt => a < b,
        CmpOp::Le => a <= b,
        CmpOp::Gt => a > b,
        CmpOp::Ge => a >= b,
    }
}

fn compare_text(op: CmpOp, a: &str, b: &str) -> bool {
    match op {
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
        _ => compare_numbers(op, text_to_number(a), text_to_number(b)),
    }
}

fn compare_bools(op: CmpOp, a: bool, b: bool) -> bool {
    match op {
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
        _ => compare_numbers(op, a as u8 as f64, b as u8 as f64),
    }
}

/// XPath 1.0 comparison, existential over node-sets
fn compare(op: CmpOp, left: Value, right: Value) -> bool {
    match (left, right) {
        (Value::NodeSet(a), Value::NodeSet(b)) => a
            .iter()
            .any(|x| b.iter().any(|y| compare_text(op, x, y))),
        (Value::NodeSet(a), Value::Bool(b)) => compare_bools(op, !a.is_empty(), b),
        (Value::NodeSet(a), Value::Num(n)) => {
            a.iter().any(|x| compare_numbers(op, text_to_number(x), n))
        }
        (Value::NodeSet(a), Value::Str(s)) => a.iter().any(|x| compare_text(op, x, &s)),
        (other, set @ Value::NodeSet(_)) => compare(op.flip(), set, other),
        (l, r) => {
            if matches!(l, Value::Bool(_)) || matches!(r, Value::Bool(_)) {
                compare_bools(op, l.to_bool(), r.to_bool())
            } else if matches!(l, Value::Num(_)) || matches!(r, Value::Num(_)) {
                compare_numbers(op, l.to_number(), r.to_number())
            } else {
                compare_text(op, &l.to_text(), &r.to_text())
            }
        }
    }
}

#[derive(Clone, Copy)]
struct Context {
    node: NodeId,
    position: usize,
    size: usize,
}

struct Evaluator<'d> {
    doc: &'d Document,
}

impl<'d> Evaluator<'d> {
    fn select_from(&self, start: NodeId, steps: &[Step]) -> Result<Vec<NodeId>, DomError> {
        let mut current = vec![start];
        for step in steps {
            current = self.apply_step(&current, step)?;
            if current.is_empty() {
                break;
            }
        }
        Ok(current)
    }

    fn apply_step(&self, context: &[NodeId], step: &Step) -> Result<Vec<NodeId>, DomError> {
        let mut out = Vec::new();
        for &origin in context {
            let bases = match step.axis {
                Axis::Descendant => self.doc.descendants_or_self(origin),
                _ => vec![origin],
            };
            for base in bases {
                let candidates: Vec<NodeId> = match step.axis {
                    Axis::Child | Axis::Descendant => self
                        .doc
                        .children(base)
                        .iter()
                        .copied()
                        .filter(|n| self.matches(*n, &step.test))
                        .collect(),
                    Axis::SelfNode => Some(base)
                        .filter(|n| self.matches(*n, &step.test))
                        .into_iter()
                        .collect(),
                    Axis::Parent => self
                        .doc
                        .parent(base)
                        .filter(|n| self.matches(*n, &step.test))
                        .into_iter()
                        .collect(),
                };
                if candidates.is_empty() {
                    continue;
                }
                out.extend(self.filter(candidates, &step.predicates)?);
            }
        }
        out.sort();
        out.dedup();
        Ok(out)
    }

    fn matches(&self, node: NodeId, test: &NodeTest) -> bool {
        let Some(kind) = self.doc.node(node).map(|n| &n.kind) else {
            return false;
        };
        match (test, kind) {
            (NodeTest::AnyNode, _) => true,
            (NodeTest::AnyElement, NodeKind::Element(_)) => true,
            (NodeTest::Name(name), NodeKind::Element(data)) => data.tag.eq_ignore_ascii_case(name),
            (NodeTest::Text, NodeKind::Text(_)) => true,
            _ => false,
        }
    }

    fn filter(&self, mut nodes: Vec<NodeId>, predicates: &[Expr]) -> Result<Vec<NodeId>, DomError> {
        for predicate in predicates {
            let size = nodes.len();
            let mut kept = Vec::with_capacity(size);
            for (index, node) in nodes.into_iter().enumerate() {
                let ctx = Context {
                    node,
                    position: index + 1,
                    size,
                };
                let keep = match self.eval(predicate, ctx)? {
                    Value::Num(n) => n == ctx.position as f64,
                    other => other.to_bool(),
                };
                if keep {
                    kept.push(node);
                }
            }
            nodes = kept;
        }
        Ok(nodes)
    }

    fn eval(&self, expr: &Expr, ctx: Context) -> Result<Value, DomError> {
        let value = match expr {
            Expr::Or(left, right) => {
                Value::Bool(self.eval(left, ctx)?.to_bool() || self.eval(right, ctx)?.to_bool())
            }
            Expr::And(left, right) => {
                Value::Bool(self.eval(left, ctx)?.to_bool() && self.eval(right, ctx)?.to_bool())
            }
            Expr::Compare(op, left, right) => {
                Value::Bool(compare(*op, self.eval(left, ctx)?, self.eval(right, ctx)?))
            }
            Expr::Attribute(name) => {
                let values = self
                    .doc
                    .element_data(ctx.node)
                    .map(|data| {
                        data.attributes
                            .iter()
                            .filter(|(n, _)| name.as_ref().map(|want| want == n).unwrap_or(true))
                            .map(|(_, v)| v.clone())
                            .collect()
                    })
                    .unwrap_or_default();
                Value::NodeSet(values)
            }
            Expr::Path(steps) => {
                let nodes = self.select_from(ctx.node, steps)?;
                Value::NodeSet(nodes.into_iter().map(|n| self.doc.string_value(n)).collect())
            }
            Expr::Literal(s) => Value::Str(s.clone()),
            Expr::Number(n) => Value::Num(*n),
            Expr::Call(function, args) => self.call(*function, args, ctx)?,
        };
        Ok(value)
    }

    fn call(&self, function: Function, args: &[Expr], ctx: Context) -> Result<Value, DomError> {
        let text_arg = |index: usize| -> Result<String, DomError> {
            match args.get(index) {
                Some(arg) => Ok(self.eval(arg, ctx)?.to_text()),
                None => Ok(self.doc.string_value(ctx.node)),
            }
        };

        let value = match function {
            Function::Contains => Value::Bool(text_arg(0)?.contains(&text_arg(1)?)),
            Function::StartsWith => Value::Bool(text_arg(0)?.starts_with(&text_arg(1)?)),
            Function::NormalizeSpace => Value::Str(
                text_arg(0)?
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Function::StringLength => Value::Num(text_arg(0)?.chars().count() as f64),
            Function::Count => match args.first().map(|arg| self.eval(arg, ctx)).transpose()? {
                Some(Value::NodeSet(items)) => Value::Num(items.len() as f64),
                _ => {
                    return Err(DomError::UnsupportedXPath(
                        "count() of a non node-set".to_string(),
                    ))
                }
            },
            Function::Not => Value::Bool(!self.eval_first(args, ctx)?.to_bool()),
            Function::Position => Value::Num(ctx.position as f64),
            Function::Last => Value::Num(ctx.size as f64),
        };
        Ok(value)
    }

    fn eval_first(&self, args: &[Expr], ctx: Context) -> Result<Value, DomError> {
        match args.first() {
            Some(arg) => self.eval(arg, ctx),
            None => Ok(Value::Bool(false)),
        }
    }
}

impl Document {
    /// Nodes selected by `expression`, document order
    pub fn select(&self, expression: &str) -> Result<Vec<NodeId>, DomError> {
        let parsed = XPathExpr::parse(expression)?;
        self.evaluate(&parsed)
    }

    pub fn evaluate(&self, expr: &XPathExpr) -> Result<Vec<NodeId>, DomError> {
        let nodes = Evaluator { doc: self }.select_from(self.root(), expr.steps())?;
        trace!("{} -> {} node(s)", expr.source(), nodes.len());
        Ok(nodes)
    }

    /// The single node `expression` selects, `None` for zero or many
    pub fn select_unique(&self, expression: &str) -> Result<Option<NodeId>, DomError> {
        let nodes = self.select(expression)?;
        Ok(match nodes.as_slice() {
            [only] => Some(*only),
            _ => None,
        })
    }
}
