//! Node constructors and tree release
//!
//! Every [`AstNode`] variant has one constructor here. Constructors copy
//! string arguments into storage owned by the new node and take ownership of
//! the child nodes and child lists passed in; callers hand children over and
//! never see them again.
//!
//! # Release
//!
//! Dropping a node releases exactly what its constructor stored: its own
//! strings, its boxed children and its child lists. The [`Drop`] impl walks
//! the subtree with an explicit work list instead of native recursion, so a
//! long left-folded chain such as `1 + 1 + ... + 1` cannot exhaust the stack
//! when it is released.

use super::ast::*;
use std::mem;

impl AstNode {
    // ===== Atoms =====

    pub fn identifier(name: &str, location: SourceLocation) -> Self {
        AstNode::Identifier {
            name: name.to_owned(),
            location,
        }
    }

    /// Literal node. String payloads are moved in; the caller's token no
    /// longer holds them.
    pub fn literal(value: Literal, location: SourceLocation) -> Self {
        AstNode::Literal { value, location }
    }

    // ===== Types =====

    pub fn primitive(ty: PrimitiveType, location: SourceLocation) -> Self {
        AstNode::Primitive { ty, location }
    }

    pub fn void(location: SourceLocation) -> Self {
        AstNode::Void { location }
    }

    pub fn null(type_of: Option<AstNode>, location: SourceLocation) -> Self {
        AstNode::Null {
            type_of: type_of.map(Box::new),
            location,
        }
    }

    pub fn pointer(pointee: AstNode, location: SourceLocation) -> Self {
        AstNode::Pointer {
            pointee: Box::new(pointee),
            location,
        }
    }

    pub fn array(
        element_type: AstNode,
        size: Option<AstNode>,
        elements: Vec<AstNode>,
        location: SourceLocation,
    ) -> Self {
        AstNode::Array {
            element_type: Box::new(element_type),
            size: size.map(Box::new),
            elements,
            location,
        }
    }

    pub fn struct_def(name: &str, fields: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Struct {
            name: name.to_owned(),
            fields,
            location,
        }
    }

    pub fn union_def(name: &str, fields: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Union {
            name: name.to_owned(),
            fields,
            location,
        }
    }

    /// Enum definition from `(name, value)` pairs, in declaration order.
    pub fn enum_def(name: &str, members: &[(&str, i64)], location: SourceLocation) -> Self {
        let (values, int_values) = members
            .iter()
            .map(|&(member, value)| (member.to_owned(), value))
            .unzip();
        AstNode::Enum {
            name: name.to_owned(),
            values,
            int_values,
            location,
        }
    }

    pub fn typedef(alias: &str, original: AstNode, location: SourceLocation) -> Self {
        AstNode::Typedef {
            alias: alias.to_owned(),
            original: Box::new(original),
            location,
        }
    }

    pub fn type_name(tag: TypeTag, name: &str, location: SourceLocation) -> Self {
        AstNode::TypeName {
            tag,
            name: name.to_owned(),
            location,
        }
    }

    // ===== Declarations =====

    pub fn declaration(
        var_type: AstNode,
        name: &str,
        initializer: Option<AstNode>,
        storage: StorageFlags,
        location: SourceLocation,
    ) -> Self {
        AstNode::Declaration {
            var_type: Box::new(var_type),
            name: name.to_owned(),
            initializer: initializer.map(Box::new),
            storage,
            location,
        }
    }

    pub fn function(
        name: &str,
        return_type: AstNode,
        params: Vec<AstNode>,
        body: Option<Vec<AstNode>>,
        storage: StorageFlags,
        location: SourceLocation,
    ) -> Self {
        AstNode::Function {
            name: name.to_owned(),
            return_type: Box::new(return_type),
            params,
            body,
            storage,
            location,
        }
    }

    pub fn impl_block(struct_name: &str, methods: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Impl {
            struct_name: struct_name.to_owned(),
            methods,
            location,
        }
    }

    pub fn lambda(params: Vec<AstNode>, body: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Lambda {
            params,
            body,
            location,
        }
    }

    // ===== Expressions =====

    pub fn assignment(
        op: AssignOp,
        target: AstNode,
        value: AstNode,
        location: SourceLocation,
    ) -> Self {
        AstNode::Assignment {
            op,
            target: Box::new(target),
            value: Box::new(value),
            location,
        }
    }

    pub fn array_access(array: AstNode, index: AstNode, location: SourceLocation) -> Self {
        AstNode::ArrayAccess {
            array: Box::new(array),
            index: Box::new(index),
            location,
        }
    }

    pub fn field_access(
        object: AstNode,
        field: &str,
        through_pointer: bool,
        location: SourceLocation,
    ) -> Self {
        AstNode::FieldAccess {
            object: Box::new(object),
            field: field.to_owned(),
            through_pointer,
            location,
        }
    }

    pub fn call(callee: AstNode, args: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Call {
            callee: Box::new(callee),
            args,
            location,
        }
    }

    pub fn unary(op: UnaryOp, operand: AstNode, location: SourceLocation) -> Self {
        AstNode::Unary {
            op,
            operand: Box::new(operand),
            location,
        }
    }

    pub fn binary(op: BinaryOp, left: AstNode, right: AstNode, location: SourceLocation) -> Self {
        AstNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            location,
        }
    }

    pub fn ternary(
        condition: AstNode,
        then_expr: AstNode,
        else_expr: AstNode,
        location: SourceLocation,
    ) -> Self {
        AstNode::Ternary {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            location,
        }
    }

    pub fn cast(target_type: AstNode, value: AstNode, location: SourceLocation) -> Self {
        AstNode::Cast {
            target_type: Box::new(target_type),
            value: Box::new(value),
            location,
        }
    }

    pub fn compound_expr(statements: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::CompoundExpr {
            statements,
            location,
        }
    }

    pub fn type_of(operand: AstNode, location: SourceLocation) -> Self {
        AstNode::TypeOf {
            operand: Box::new(operand),
            location,
        }
    }

    pub fn size_of(operand: AstNode, location: SourceLocation) -> Self {
        AstNode::SizeOf {
            operand: Box::new(operand),
            location,
        }
    }

    // ===== Statements =====

    pub fn block(statements: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Block {
            statements,
            location,
        }
    }

    pub fn if_stmt(
        condition: AstNode,
        then_branch: AstNode,
        else_branch: Option<AstNode>,
        location: SourceLocation,
    ) -> Self {
        AstNode::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
            location,
        }
    }

    pub fn switch(scrutinee: AstNode, cases: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Switch {
            scrutinee: Box::new(scrutinee),
            cases,
            location,
        }
    }

    pub fn case(value: AstNode, body: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Case {
            value: Box::new(value),
            body,
            location,
        }
    }

    pub fn default_case(body: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Default { body, location }
    }

    pub fn while_loop(condition: AstNode, body: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::While {
            condition: Box::new(condition),
            body,
            location,
        }
    }

    pub fn do_while(body: Vec<AstNode>, condition: AstNode, location: SourceLocation) -> Self {
        AstNode::DoWhile {
            body,
            condition: Box::new(condition),
            location,
        }
    }

    pub fn for_loop(
        init: Option<AstNode>,
        condition: Option<AstNode>,
        increment: Option<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    ) -> Self {
        AstNode::For {
            init: init.map(Box::new),
            condition: condition.map(Box::new),
            increment: increment.map(Box::new),
            body,
            location,
        }
    }

    pub fn break_stmt(location: SourceLocation) -> Self {
        AstNode::Break { location }
    }

    pub fn continue_stmt(location: SourceLocation) -> Self {
        AstNode::Continue { location }
    }

    pub fn return_stmt(value: Option<AstNode>, location: SourceLocation) -> Self {
        AstNode::Return {
            value: value.map(Box::new),
            location,
        }
    }

    pub fn label(name: &str, location: SourceLocation) -> Self {
        AstNode::Label {
            name: name.to_owned(),
            location,
        }
    }

    pub fn jump(label: &str, location: SourceLocation) -> Self {
        AstNode::Jump {
            label: label.to_owned(),
            location,
        }
    }

    pub fn try_stmt(body: Vec<AstNode>, catches: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Try {
            body,
            catches,
            location,
        }
    }

    pub fn catch(binding: Option<AstNode>, body: Vec<AstNode>, location: SourceLocation) -> Self {
        AstNode::Catch {
            binding: binding.map(Box::new),
            body,
            location,
        }
    }

    pub fn throw(value: AstNode, location: SourceLocation) -> Self {
        AstNode::Throw {
            value: Box::new(value),
            location,
        }
    }

    // ===== Memory intrinsics =====

    pub fn malloc(size: AstNode, location: SourceLocation) -> Self {
        AstNode::Malloc {
            size: Box::new(size),
            location,
        }
    }

    pub fn calloc(count: AstNode, size: AstNode, location: SourceLocation) -> Self {
        AstNode::Calloc {
            count: Box::new(count),
            size: Box::new(size),
            location,
        }
    }

    pub fn realloc(pointer: AstNode, size: AstNode, location: SourceLocation) -> Self {
        AstNode::Realloc {
            pointer: Box::new(pointer),
            size: Box::new(size),
            location,
        }
    }

    pub fn free(pointer: AstNode, location: SourceLocation) -> Self {
        AstNode::Free {
            pointer: Box::new(pointer),
            location,
        }
    }

    pub fn memcpy(dest: AstNode, src: AstNode, size: AstNode, location: SourceLocation) -> Self {
        AstNode::Memcpy {
            dest: Box::new(dest),
            src: Box::new(src),
            size: Box::new(size),
            location,
        }
    }

    pub fn memset(dest: AstNode, value: AstNode, size: AstNode, location: SourceLocation) -> Self {
        AstNode::Memset {
            dest: Box::new(dest),
            value: Box::new(value),
            size: Box::new(size),
            location,
        }
    }

    pub fn memmove(dest: AstNode, src: AstNode, size: AstNode, location: SourceLocation) -> Self {
        AstNode::Memmove {
            dest: Box::new(dest),
            src: Box::new(src),
            size: Box::new(size),
            location,
        }
    }

    // ===== Release =====

    fn is_leaf(&self) -> bool {
        matches!(
            self.kind(),
            NodeKind::Identifier
                | NodeKind::Literal
                | NodeKind::Primitive
                | NodeKind::Void
                | NodeKind::Enum
                | NodeKind::TypeName
                | NodeKind::Break
                | NodeKind::Continue
                | NodeKind::Label
                | NodeKind::Jump
        )
    }

    /// Move every child of this node onto `out`, leaving the node childless.
    ///
    /// The set of fields visited per variant is exactly the set of child
    /// fields the matching constructor stores.
    fn detach_children(&mut self, out: &mut Vec<AstNode>) {
        match self {
            AstNode::Identifier { .. }
            | AstNode::Literal { .. }
            | AstNode::Primitive { .. }
            | AstNode::Void { .. }
            | AstNode::Enum { .. }
            | AstNode::TypeName { .. }
            | AstNode::Break { .. }
            | AstNode::Continue { .. }
            | AstNode::Label { .. }
            | AstNode::Jump { .. } => {}

            AstNode::Null { type_of, .. } => take_opt(type_of, out),
            AstNode::Pointer { pointee, .. } => take_box(pointee, out),
            AstNode::Array {
                element_type,
                size,
                elements,
                ..
            } => {
                take_box(element_type, out);
                take_opt(size, out);
                out.append(elements);
            }
            AstNode::Struct { fields, .. } | AstNode::Union { fields, .. } => out.append(fields),
            AstNode::Typedef { original, .. } => take_box(original, out),

            AstNode::Declaration {
                var_type,
                initializer,
                ..
            } => {
                take_box(var_type, out);
                take_opt(initializer, out);
            }
            AstNode::Function {
                return_type,
                params,
                body,
                ..
            } => {
                take_box(return_type, out);
                out.append(params);
                if let Some(body) = body {
                    out.append(body);
                }
            }
            AstNode::Impl { methods, .. } => out.append(methods),
            AstNode::Lambda { params, body, .. } => {
                out.append(params);
                out.append(body);
            }

            AstNode::Assignment { target, value, .. } => {
                take_box(target, out);
                take_box(value, out);
            }
            AstNode::ArrayAccess { array, index, .. } => {
                take_box(array, out);
                take_box(index, out);
            }
            AstNode::FieldAccess { object, .. } => take_box(object, out),
            AstNode::Call { callee, args, .. } => {
                take_box(callee, out);
                out.append(args);
            }
            AstNode::Unary { operand, .. }
            | AstNode::TypeOf { operand, .. }
            | AstNode::SizeOf { operand, .. } => take_box(operand, out),
            AstNode::Binary { left, right, .. } => {
                take_box(left, out);
                take_box(right, out);
            }
            AstNode::Ternary {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                take_box(condition, out);
                take_box(then_expr, out);
                take_box(else_expr, out);
            }
            AstNode::Cast {
                target_type, value, ..
            } => {
                take_box(target_type, out);
                take_box(value, out);
            }
            AstNode::CompoundExpr { statements, .. } | AstNode::Block { statements, .. } => {
                out.append(statements)
            }

            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                take_box(condition, out);
                take_box(then_branch, out);
                take_opt(else_branch, out);
            }
            AstNode::Switch {
                scrutinee, cases, ..
            } => {
                take_box(scrutinee, out);
                out.append(cases);
            }
            AstNode::Case { value, body, .. } => {
                take_box(value, out);
                out.append(body);
            }
            AstNode::Default { body, .. } => out.append(body),
            AstNode::While {
                condition, body, ..
            }
            | AstNode::DoWhile {
                condition, body, ..
            } => {
                take_box(condition, out);
                out.append(body);
            }
            AstNode::For {
                init,
                condition,
                increment,
                body,
                ..
            } => {
                take_opt(init, out);
                take_opt(condition, out);
                take_opt(increment, out);
                out.append(body);
            }
            AstNode::Return { value, .. } => take_opt(value, out),
            AstNode::Try { body, catches, .. } => {
                out.append(body);
                out.append(catches);
            }
            AstNode::Catch { binding, body, .. } => {
                take_opt(binding, out);
                out.append(body);
            }
            AstNode::Throw { value, .. } => take_box(value, out),

            AstNode::Malloc { size, .. } => take_box(size, out),
            AstNode::Calloc { count, size, .. } => {
                take_box(count, out);
                take_box(size, out);
            }
            AstNode::Realloc { pointer, size, .. } => {
                take_box(pointer, out);
                take_box(size, out);
            }
            AstNode::Free { pointer, .. } => take_box(pointer, out),
            AstNode::Memcpy { dest, src, size, .. } | AstNode::Memmove { dest, src, size, .. } => {
                take_box(dest, out);
                take_box(src, out);
                take_box(size, out);
            }
            AstNode::Memset {
                dest, value, size, ..
            } => {
                take_box(dest, out);
                take_box(value, out);
                take_box(size, out);
            }
        }
    }
}

/// Swap a boxed child out for a leaf placeholder that owns no heap memory.
/// Leaf children stay where they are; dropping them cannot recurse.
fn take_box(child: &mut Box<AstNode>, out: &mut Vec<AstNode>) {
    if child.is_leaf() {
        return;
    }
    let placeholder = AstNode::Void {
        location: child.location(),
    };
    out.push(mem::replace(&mut **child, placeholder));
}

fn take_opt(child: &mut Option<Box<AstNode>>, out: &mut Vec<AstNode>) {
    if let Some(child) = child.take() {
        out.push(*child);
    }
}

impl Drop for AstNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
            // `node` drops here with no children left
        }
    }
}

/// Release a whole tree. `None` is a no-op.
///
/// Equivalent to dropping the root; it exists so code holding an optional
/// root has one explicit release point.
pub fn free_tree(root: Option<AstNode>) {
    drop(root);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    fn int(v: i32) -> AstNode {
        AstNode::literal(Literal::Int(v), loc())
    }

    #[test]
    fn test_strings_are_copied() {
        let name = String::from("counter");
        let node = AstNode::identifier(&name, loc());
        drop(name);
        match &node {
            AstNode::Identifier { name, .. } => assert_eq!(name, "counter"),
            _ => panic!("Expected identifier"),
        }
    }

    #[test]
    fn test_enum_values_are_parallel() {
        let node = AstNode::enum_def("Color", &[("RED", 0), ("GREEN", 5)], loc());
        match &node {
            AstNode::Enum {
                name,
                values,
                int_values,
                ..
            } => {
                assert_eq!(name, "Color");
                assert_eq!(values, &["RED".to_string(), "GREEN".to_string()]);
                assert_eq!(int_values, &[0, 5]);
            }
            _ => panic!("Expected enum"),
        }
    }

    #[test]
    fn test_enum_lists_stay_parallel() {
        for members in [&[][..], &[("ONLY", -3)][..], &[("A", 0), ("B", 1), ("C", 1)][..]] {
            match AstNode::enum_def("E", members, loc()) {
                AstNode::Enum {
                    ref values,
                    ref int_values,
                    ..
                } => {
                    assert_eq!(values.len(), members.len());
                    assert_eq!(int_values.len(), members.len());
                    let pairs = values.iter().zip(int_values).zip(members);
                    for ((value, int), (member, expected)) in pairs {
                        assert_eq!(value, member);
                        assert_eq!(int, expected);
                    }
                }
                _ => panic!("Expected enum"),
            }
        }
    }

    #[test]
    fn test_detach_moves_inner_children() {
        let inner = AstNode::unary(UnaryOp::Neg, int(2), loc());
        let mut node = AstNode::binary(BinaryOp::Add, int(1), inner, loc());
        let mut out = Vec::new();
        node.detach_children(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind(), NodeKind::Unary);

        // Second pass finds only leaves
        let mut again = Vec::new();
        node.detach_children(&mut again);
        assert!(again.is_empty());
    }

    #[test]
    fn test_deep_chain_drops_without_recursion() {
        let mut expr = int(0);
        for i in 1..200_000 {
            expr = AstNode::binary(BinaryOp::Add, expr, int(i), loc());
        }
        free_tree(Some(expr));
    }

    #[test]
    fn test_free_tree_none_is_noop() {
        free_tree(None);
    }
}
