//! Compact s-expression rendering of the tree
//!
//! `1 + 2 * 3` renders as `(+ 1 (* 2 3))`. Types render as `int`,
//! `(ptr char)`, `(array int 3)`, `(struct Point)`. Child lists render as
//! a parenthesized group wherever a node owns more than one list.
//!
//! Rendering recurses over the tree, so it is meant for tests and debug
//! output rather than for arbitrarily deep input.

use super::ast::*;
use std::fmt;

/// `(a b c)`
struct List<'a>(&'a [AstNode]);

impl fmt::Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_all(f, self.0, false)?;
        f.write_str(")")
    }
}

/// Space-separated items, optionally with a space before the first one too
fn write_all(f: &mut fmt::Formatter<'_>, nodes: &[AstNode], leading_space: bool) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 || leading_space {
            f.write_str(" ")?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

fn write_opt(f: &mut fmt::Formatter<'_>, node: &Option<Box<AstNode>>) -> fmt::Result {
    match node {
        Some(node) => write!(f, " {}", node),
        None => f.write_str(" _"),
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Identifier { name, .. } => f.write_str(name),
            AstNode::Literal { value, .. } => write!(f, "{}", value),
            AstNode::Primitive { ty, .. } => write!(f, "{}", ty),
            AstNode::Void { .. } => f.write_str("void"),
            AstNode::Null { type_of, .. } => match type_of {
                Some(ty) => write!(f, "(null {})", ty),
                None => f.write_str("null"),
            },
            AstNode::Pointer { pointee, .. } => write!(f, "(ptr {})", pointee),
            AstNode::Array {
                element_type,
                size,
                elements,
                ..
            } => {
                write!(f, "(array {}", element_type)?;
                if let Some(size) = size {
                    write!(f, " {}", size)?;
                }
                if !elements.is_empty() {
                    write!(f, " {}", List(elements))?;
                }
                f.write_str(")")
            }
            AstNode::Struct { name, fields, .. } => {
                write!(f, "(defstruct {}", name)?;
                write_all(f, fields, true)?;
                f.write_str(")")
            }
            AstNode::Union { name, fields, .. } => {
                write!(f, "(defunion {}", name)?;
                write_all(f, fields, true)?;
                f.write_str(")")
            }
            AstNode::Enum {
                name,
                values,
                int_values,
                ..
            } => {
                write!(f, "(defenum {}", name)?;
                for (value, int) in values.iter().zip(int_values) {
                    write!(f, " {}={}", value, int)?;
                }
                f.write_str(")")
            }
            AstNode::Typedef {
                alias, original, ..
            } => write!(f, "(deftype {} {})", alias, original),
            AstNode::TypeName { tag, name, .. } => write!(f, "({} {})", tag, name),

            AstNode::Declaration {
                var_type,
                name,
                initializer,
                storage,
                ..
            } => {
                f.write_str("(decl ")?;
                if !storage.is_empty() {
                    write!(f, "[{}] ", storage)?;
                }
                write!(f, "{} {}", name, var_type)?;
                if let Some(init) = initializer {
                    write!(f, " = {}", init)?;
                }
                f.write_str(")")
            }
            AstNode::Function {
                name,
                return_type,
                params,
                body,
                storage,
                ..
            } => {
                f.write_str(if body.is_some() { "(fun " } else { "(proto " })?;
                if !storage.is_empty() {
                    write!(f, "[{}] ", storage)?;
                }
                write!(f, "{} {} {}", name, return_type, List(params))?;
                if let Some(body) = body {
                    write_all(f, body, true)?;
                }
                f.write_str(")")
            }
            AstNode::Impl {
                struct_name,
                methods,
                ..
            } => {
                write!(f, "(impl {}", struct_name)?;
                write_all(f, methods, true)?;
                f.write_str(")")
            }
            AstNode::Lambda { params, body, .. } => {
                write!(f, "(lambda {}", List(params))?;
                write_all(f, body, true)?;
                f.write_str(")")
            }

            AstNode::Assignment {
                op, target, value, ..
            } => write!(f, "({} {} {})", op, target, value),
            AstNode::ArrayAccess { array, index, .. } => write!(f, "(index {} {})", array, index),
            AstNode::FieldAccess {
                object,
                field,
                through_pointer,
                ..
            } => {
                let op = if *through_pointer { "->" } else { "." };
                write!(f, "({} {} {})", op, object, field)
            }
            AstNode::Call { callee, args, .. } => {
                write!(f, "(call {}", callee)?;
                write_all(f, args, true)?;
                f.write_str(")")
            }
            AstNode::Unary { op, operand, .. } => write!(f, "({} {})", op, operand),
            AstNode::Binary {
                op, left, right, ..
            } => write!(f, "({} {} {})", op, left, right),
            AstNode::Ternary {
                condition,
                then_expr,
                else_expr,
                ..
            } => write!(f, "(? {} {} {})", condition, then_expr, else_expr),
            AstNode::Cast {
                target_type, value, ..
            } => write!(f, "(cast {} {})", target_type, value),
            AstNode::CompoundExpr { statements, .. } => {
                f.write_str("(compound")?;
                write_all(f, statements, true)?;
                f.write_str(")")
            }
            AstNode::TypeOf { operand, .. } => write!(f, "(typeof {})", operand),
            AstNode::SizeOf { operand, .. } => write!(f, "(sizeof {})", operand),

            AstNode::Block { statements, .. } => {
                f.write_str("(block")?;
                write_all(f, statements, true)?;
                f.write_str(")")
            }
            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                write!(f, "(if {} {}", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " {}", else_branch)?;
                }
                f.write_str(")")
            }
            AstNode::Switch {
                scrutinee, cases, ..
            } => {
                write!(f, "(switch {}", scrutinee)?;
                write_all(f, cases, true)?;
                f.write_str(")")
            }
            AstNode::Case { value, body, .. } => {
                write!(f, "(case {}", value)?;
                write_all(f, body, true)?;
                f.write_str(")")
            }
            AstNode::Default { body, .. } => {
                f.write_str("(default")?;
                write_all(f, body, true)?;
                f.write_str(")")
            }
            AstNode::While {
                condition, body, ..
            } => {
                write!(f, "(while {}", condition)?;
                write_all(f, body, true)?;
                f.write_str(")")
            }
            AstNode::DoWhile {
                body, condition, ..
            } => {
                write!(f, "(do-while {}", condition)?;
                write_all(f, body, true)?;
                f.write_str(")")
            }
            AstNode::For {
                init,
                condition,
                increment,
                body,
                ..
            } => {
                f.write_str("(for")?;
                write_opt(f, init)?;
                write_opt(f, condition)?;
                write_opt(f, increment)?;
                write_all(f, body, true)?;
                f.write_str(")")
            }
            AstNode::Break { .. } => f.write_str("(break)"),
            AstNode::Continue { .. } => f.write_str("(continue)"),
            AstNode::Return { value, .. } => match value {
                Some(value) => write!(f, "(return {})", value),
                None => f.write_str("(return)"),
            },
            AstNode::Label { name, .. } => write!(f, "(label {})", name),
            AstNode::Jump { label, .. } => write!(f, "(jump {})", label),
            AstNode::Try { body, catches, .. } => {
                write!(f, "(try {}", List(body))?;
                write_all(f, catches, true)?;
                f.write_str(")")
            }
            AstNode::Catch { binding, body, .. } => {
                f.write_str("(catch")?;
                write_opt(f, binding)?;
                write!(f, " {})", List(body))
            }
            AstNode::Throw { value, .. } => write!(f, "(throw {})", value),

            AstNode::Malloc { size, .. } => write!(f, "(malloc {})", size),
            AstNode::Calloc { count, size, .. } => write!(f, "(calloc {} {})", count, size),
            AstNode::Realloc { pointer, size, .. } => write!(f, "(realloc {} {})", pointer, size),
            AstNode::Free { pointer, .. } => write!(f, "(free {})", pointer),
            AstNode::Memcpy {
                dest, src, size, ..
            } => write!(f, "(memcpy {} {} {})", dest, src, size),
            AstNode::Memset {
                dest, value, size, ..
            } => write!(f, "(memset {} {} {})", dest, value, size),
            AstNode::Memmove {
                dest, src, size, ..
            } => write!(f, "(memmove {} {} {})", dest, src, size),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::default()
    }

    fn ident(name: &str) -> AstNode {
        AstNode::identifier(name, loc())
    }

    #[test]
    fn test_declaration_rendering() {
        let decl = AstNode::declaration(
            AstNode::primitive(PrimitiveType::Int, loc()),
            "x",
            Some(AstNode::literal(Literal::Int(5), loc())),
            StorageFlags::CONST.with(StorageFlags::STATIC),
            loc(),
        );
        assert_eq!(decl.to_string(), "(decl [const static] x int = 5)");
    }

    #[test]
    fn test_for_rendering_marks_missing_clauses() {
        let node = AstNode::for_loop(None, Some(ident("go")), None, vec![], loc());
        assert_eq!(node.to_string(), "(for _ go _)");
    }

    #[test]
    fn test_function_rendering() {
        let proto = AstNode::function(
            "f",
            AstNode::void(loc()),
            vec![],
            None,
            StorageFlags::empty(),
            loc(),
        );
        assert_eq!(proto.to_string(), "(proto f void ())");

        let def = AstNode::function(
            "g",
            AstNode::void(loc()),
            vec![],
            Some(vec![AstNode::return_stmt(None, loc())]),
            StorageFlags::empty(),
            loc(),
        );
        assert_eq!(def.to_string(), "(fun g void () (return))");
    }
}
