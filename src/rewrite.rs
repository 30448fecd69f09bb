//! Special-case patterns recognised on expressions before the generic path.
//!
//! Rules are tried in order and the first match wins. Each backend handles
//! every `Rewrite` variant itself, so adding a rule means adding a variant
//! and a matcher here; the compiler then points at the backends that must
//! learn about it.

use crate::ast::{BinOp, Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite<'a> {
    /// `x * x`: a variable multiplied by itself
    Square { name: &'a str },
}

type Matcher = for<'a> fn(&'a Node) -> Option<Rewrite<'a>>;

const RULES: &[Matcher] = &[match_square];

/// First rewrite that applies to `node`, if any
pub fn find_rewrite(node: &Node) -> Option<Rewrite<'_>> {
    RULES.iter().find_map(|rule| rule(node))
}

fn match_square(node: &Node) -> Option<Rewrite<'_>> {
    let NodeKind::BinaryOp {
        left,
        op: BinOp::Mul,
        right,
    } = &node.kind
    else {
        return None;
    };
    match (&left.kind, &right.kind) {
        (NodeKind::Variable(lhs), NodeKind::Variable(rhs)) if lhs == rhs => {
            Some(Rewrite::Square { name: lhs })
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "_tests/test_rewrite.rs"]
mod test_rewrite;
