//! Dropping a tree hands back every byte it allocated.

use crisp::parser::ast::{AssignOp, BinaryOp, Literal, PrimitiveType, StorageFlags, TypeTag, UnaryOp};
use crisp::{free_tree, parse_source, AstNode, NodeKind, SourceLocation};
use rustc_hash::FxHashSet;
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

/// System allocator that tracks live bytes per thread
struct CountingAlloc;

thread_local! {
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn record(delta: isize) {
    let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + delta));
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record(layout.size() as isize);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record(-(layout.size() as isize));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            record(new_size as isize - layout.size() as isize);
        }
        new_ptr
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn live_bytes() -> isize {
    LIVE_BYTES.with(Cell::get)
}

fn loc() -> SourceLocation {
    SourceLocation::new(1, 1)
}

fn id(name: &str) -> AstNode {
    AstNode::identifier(name, loc())
}

fn int(v: i32) -> AstNode {
    AstNode::literal(Literal::Int(v), loc())
}

fn int_type() -> AstNode {
    AstNode::primitive(PrimitiveType::Int, loc())
}

fn decl(name: &str) -> AstNode {
    AstNode::declaration(int_type(), name, Some(int(0)), StorageFlags::empty(), loc())
}

/// One node of every kind, each with owned children where the kind has any
fn every_kind() -> Vec<AstNode> {
    vec![
        id("x"),
        AstNode::literal(Literal::String("text".to_owned()), loc()),
        int_type(),
        AstNode::void(loc()),
        AstNode::null(Some(AstNode::pointer(int_type(), loc())), loc()),
        AstNode::pointer(AstNode::pointer(int_type(), loc()), loc()),
        AstNode::array(int_type(), Some(int(3)), vec![int(1), int(2), int(3)], loc()),
        AstNode::struct_def("Point", vec![decl("x"), decl("y")], loc()),
        AstNode::union_def("Value", vec![decl("i"), decl("f")], loc()),
        AstNode::enum_def("Color", &[("RED", 0), ("GREEN", 1)], loc()),
        AstNode::typedef("Score", int_type(), loc()),
        AstNode::type_name(TypeTag::Struct, "Point", loc()),
        decl("d"),
        AstNode::function(
            "main",
            int_type(),
            vec![decl("argc")],
            Some(vec![AstNode::return_stmt(Some(int(0)), loc())]),
            StorageFlags::STATIC,
            loc(),
        ),
        AstNode::impl_block(
            "Point",
            vec![AstNode::function("len", int_type(), vec![], None, StorageFlags::empty(), loc())],
            loc(),
        ),
        AstNode::lambda(vec![decl("a")], vec![AstNode::return_stmt(Some(id("a")), loc())], loc()),
        AstNode::assignment(AssignOp::Add, id("a"), int(1), loc()),
        AstNode::array_access(id("a"), int(0), loc()),
        AstNode::field_access(id("p"), "next", true, loc()),
        AstNode::call(id("f"), vec![id("a"), int(2)], loc()),
        AstNode::unary(UnaryOp::Neg, id("a"), loc()),
        AstNode::binary(BinaryOp::Mul, id("a"), int(2), loc()),
        AstNode::ternary(id("c"), id("a"), id("b"), loc()),
        AstNode::cast(AstNode::pointer(int_type(), loc()), id("p"), loc()),
        AstNode::compound_expr(vec![decl("t"), id("t")], loc()),
        AstNode::type_of(id("a"), loc()),
        AstNode::size_of(int_type(), loc()),
        AstNode::block(vec![decl("b"), AstNode::break_stmt(loc())], loc()),
        AstNode::if_stmt(id("c"), AstNode::block(vec![], loc()), Some(AstNode::block(vec![], loc())), loc()),
        AstNode::switch(
            id("x"),
            vec![
                AstNode::case(int(1), vec![AstNode::break_stmt(loc())], loc()),
                AstNode::default_case(vec![AstNode::continue_stmt(loc())], loc()),
            ],
            loc(),
        ),
        AstNode::case(int(2), vec![id("a")], loc()),
        AstNode::default_case(vec![id("b")], loc()),
        AstNode::while_loop(id("c"), vec![id("a")], loc()),
        AstNode::do_while(vec![id("a")], id("c"), loc()),
        AstNode::for_loop(Some(decl("i")), Some(id("c")), Some(id("i")), vec![id("a")], loc()),
        AstNode::break_stmt(loc()),
        AstNode::continue_stmt(loc()),
        AstNode::return_stmt(Some(id("a")), loc()),
        AstNode::label("retry", loc()),
        AstNode::jump("retry", loc()),
        AstNode::try_stmt(
            vec![AstNode::throw(int(1), loc())],
            vec![AstNode::catch(Some(decl("e")), vec![id("e")], loc())],
            loc(),
        ),
        AstNode::catch(None, vec![], loc()),
        AstNode::throw(id("err"), loc()),
        AstNode::malloc(int(16), loc()),
        AstNode::calloc(int(4), int(4), loc()),
        AstNode::realloc(id("p"), int(32), loc()),
        AstNode::free(id("p"), loc()),
        AstNode::memcpy(id("d"), id("s"), int(8), loc()),
        AstNode::memset(id("d"), int(0), int(8), loc()),
        AstNode::memmove(id("d"), id("s"), int(8), loc()),
    ]
}

#[test]
fn test_every_kind_is_covered() {
    let nodes = every_kind();
    let kinds: FxHashSet<NodeKind> = nodes.iter().map(AstNode::kind).collect();
    assert_eq!(kinds.len(), 50);
}

#[test]
fn test_dropping_every_kind_releases_everything() {
    let before = live_bytes();
    let nodes = every_kind();
    assert!(live_bytes() > before);
    drop(nodes);
    assert_eq!(live_bytes(), before);
}

#[test]
fn test_free_tree_releases_everything() {
    let before = live_bytes();
    for node in every_kind() {
        free_tree(Some(node));
    }
    free_tree(None);
    assert_eq!(live_bytes(), before);
}

#[test]
fn test_deep_chain_releases_everything() {
    let before = live_bytes();
    let mut node = id("x");
    for _ in 0..100_000 {
        node = AstNode::unary(UnaryOp::Not, node, loc());
    }
    drop(node);
    assert_eq!(live_bytes(), before);
}

#[test]
fn test_parsed_program_releases_everything() {
    let source = "struct P { int x; };\n\
                  int main() { int a[2] = {1, 2}; for (;;) { a[0] += sizeof(struct P); } return 0; }";
    // Warm up lazily initialized tables so they are not counted below.
    drop(parse_source(source));

    let before = live_bytes();
    let program = parse_source(source).unwrap();
    drop(program);
    assert_eq!(live_bytes(), before);
}

#[test]
fn test_failed_parse_releases_partial_trees() {
    let source = "int main() { int x = (1 + 2) * f(3, 4); return x +; }";
    drop(parse_source(source));

    let before = live_bytes();
    let err = parse_source(source).unwrap_err();
    drop(err);
    assert_eq!(live_bytes(), before);
}
