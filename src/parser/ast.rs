// AST (Abstract Syntax Tree) definitions for the front end

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Scalar types named by a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    SChar,
    Char,
    UChar,
    String,
    /// Pointer-sized signed integer
    Arch,
    /// Pointer-sized unsigned integer
    UArch,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Bool => "bool",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::UShort => "ushort",
            PrimitiveType::Int => "int",
            PrimitiveType::UInt => "uint",
            PrimitiveType::Long => "long",
            PrimitiveType::ULong => "ulong",
            PrimitiveType::LongLong => "long long",
            PrimitiveType::ULongLong => "ulong long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::LongDouble => "long double",
            PrimitiveType::SChar => "schar",
            PrimitiveType::Char => "char",
            PrimitiveType::UChar => "uchar",
            PrimitiveType::String => "string",
            PrimitiveType::Arch => "arch",
            PrimitiveType::UArch => "uarch",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A literal value tagged by its primitive type.
///
/// `long double` has no native Rust counterpart and is held as `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    LongLong(i64),
    ULongLong(u64),
    Float(f32),
    Double(f64),
    LongDouble(f64),
    SChar(i8),
    Char(i8),
    UChar(u8),
    String(String),
}

impl Literal {
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Literal::Bool(_) => PrimitiveType::Bool,
            Literal::Short(_) => PrimitiveType::Short,
            Literal::UShort(_) => PrimitiveType::UShort,
            Literal::Int(_) => PrimitiveType::Int,
            Literal::UInt(_) => PrimitiveType::UInt,
            Literal::Long(_) => PrimitiveType::Long,
            Literal::ULong(_) => PrimitiveType::ULong,
            Literal::LongLong(_) => PrimitiveType::LongLong,
            Literal::ULongLong(_) => PrimitiveType::ULongLong,
            Literal::Float(_) => PrimitiveType::Float,
            Literal::Double(_) => PrimitiveType::Double,
            Literal::LongDouble(_) => PrimitiveType::LongDouble,
            Literal::SChar(_) => PrimitiveType::SChar,
            Literal::Char(_) => PrimitiveType::Char,
            Literal::UChar(_) => PrimitiveType::UChar,
            Literal::String(_) => PrimitiveType::String,
        }
    }

    /// Integer value of an integral literal, if it fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Literal::Short(v) => Some(v.into()),
            Literal::UShort(v) => Some(v.into()),
            Literal::Int(v) => Some(v.into()),
            Literal::UInt(v) => Some(v.into()),
            Literal::Long(v) | Literal::LongLong(v) => Some(v),
            Literal::ULong(v) | Literal::ULongLong(v) => i64::try_from(v).ok(),
            Literal::SChar(v) | Literal::Char(v) => Some(v.into()),
            Literal::UChar(v) => Some(v.into()),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(v) => write!(f, "{}", v),
            Literal::Short(v) => write!(f, "{}", v),
            Literal::UShort(v) => write!(f, "{}", v),
            Literal::Int(v) => write!(f, "{}", v),
            Literal::UInt(v) => write!(f, "{}", v),
            Literal::Long(v) | Literal::LongLong(v) => write!(f, "{}", v),
            Literal::ULong(v) | Literal::ULongLong(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{:?}", v),
            Literal::Double(v) | Literal::LongDouble(v) => write!(f, "{:?}", v),
            Literal::SChar(v) | Literal::Char(v) => {
                let byte = *v as u8;
                if byte.is_ascii_graphic() || byte == b' ' {
                    write!(f, "'{}'", byte as char)
                } else {
                    write!(f, "'\\x{:02x}'", byte)
                }
            }
            Literal::UChar(v) => write!(f, "'\\x{:02x}'", v),
            Literal::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Storage qualifiers attached to a declaration or function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StorageFlags(u8);

impl StorageFlags {
    pub const CONST: StorageFlags = StorageFlags(1 << 0);
    pub const STATIC: StorageFlags = StorageFlags(1 << 1);
    pub const EXTERN: StorageFlags = StorageFlags(1 << 2);
    pub const VOLATILE: StorageFlags = StorageFlags(1 << 3);
    pub const ATOMIC: StorageFlags = StorageFlags(1 << 4);

    pub const fn empty() -> Self {
        StorageFlags(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: StorageFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: StorageFlags) {
        self.0 |= other.0;
    }

    pub fn with(mut self, other: StorageFlags) -> Self {
        self.insert(other);
        self
    }
}

impl fmt::Display for StorageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (StorageFlags::CONST, "const"),
            (StorageFlags::STATIC, "static"),
            (StorageFlags::EXTERN, "extern"),
            (StorageFlags::VOLATILE, "volatile"),
            (StorageFlags::ATOMIC, "atomic"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        };
        f.write_str(symbol)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,    // +x
    Neg,     // -x
    Not,     // !x
    BitNot,  // ~x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
    Deref,   // *x
    AddrOf,  // &x
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc => "++",
            UnaryOp::PreDec => "--",
            UnaryOp::PostInc => "post++",
            UnaryOp::PostDec => "post--",
            UnaryOp::Deref => "deref",
            UnaryOp::AddrOf => "addr",
        };
        f.write_str(symbol)
    }
}

/// Plain and compound assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
        };
        f.write_str(symbol)
    }
}

/// Which namespace a [`AstNode::TypeName`] refers into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Struct,
    Union,
    Enum,
    Typedef,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeTag::Struct => "struct",
            TypeTag::Union => "union",
            TypeTag::Enum => "enum",
            TypeTag::Typedef => "typedef",
        })
    }
}

/// Discriminant of [`AstNode`], one entry per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Identifier,
    Literal,
    Primitive,
    Void,
    Null,
    Pointer,
    Array,
    Struct,
    Union,
    Enum,
    Typedef,
    TypeName,
    Declaration,
    Function,
    Impl,
    Lambda,
    Assignment,
    ArrayAccess,
    FieldAccess,
    Call,
    Unary,
    Binary,
    Ternary,
    Cast,
    CompoundExpr,
    TypeOf,
    SizeOf,
    Block,
    If,
    Switch,
    Case,
    Default,
    While,
    DoWhile,
    For,
    Break,
    Continue,
    Return,
    Label,
    Jump,
    Try,
    Catch,
    Throw,
    Malloc,
    Calloc,
    Realloc,
    Free,
    Memcpy,
    Memset,
    Memmove,
}

/// AST nodes representing types, declarations, statements and expressions.
///
/// Every child is owned by exactly one parent. Nodes are built through the
/// constructors in [`super::factory`]; dropping a node releases its whole
/// subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    // Atoms
    Identifier {
        name: String,
        location: SourceLocation,
    },
    Literal {
        value: Literal,
        location: SourceLocation,
    },

    // Types
    Primitive {
        ty: PrimitiveType,
        location: SourceLocation,
    },
    Void {
        location: SourceLocation,
    },
    Null {
        type_of: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    Pointer {
        pointee: Box<AstNode>,
        location: SourceLocation,
    },
    Array {
        element_type: Box<AstNode>,
        size: Option<Box<AstNode>>, // None for an unsized dimension
        elements: Vec<AstNode>,
        location: SourceLocation,
    },
    Struct {
        name: String,
        fields: Vec<AstNode>,
        location: SourceLocation,
    },
    Union {
        name: String,
        fields: Vec<AstNode>,
        location: SourceLocation,
    },
    Enum {
        name: String,
        values: Vec<String>,
        int_values: Vec<i64>, // parallel to `values`
        location: SourceLocation,
    },
    Typedef {
        alias: String,
        original: Box<AstNode>,
        location: SourceLocation,
    },
    TypeName {
        tag: TypeTag,
        name: String,
        location: SourceLocation,
    },

    // Declarations
    Declaration {
        var_type: Box<AstNode>,
        name: String,
        initializer: Option<Box<AstNode>>,
        storage: StorageFlags,
        location: SourceLocation,
    },
    Function {
        name: String,
        return_type: Box<AstNode>,
        params: Vec<AstNode>,
        body: Option<Vec<AstNode>>, // None for a prototype
        storage: StorageFlags,
        location: SourceLocation,
    },
    Impl {
        struct_name: String,
        methods: Vec<AstNode>,
        location: SourceLocation,
    },
    Lambda {
        params: Vec<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },

    // Expressions
    Assignment {
        op: AssignOp,
        target: Box<AstNode>,
        value: Box<AstNode>,
        location: SourceLocation,
    },
    ArrayAccess {
        array: Box<AstNode>,
        index: Box<AstNode>,
        location: SourceLocation,
    },
    FieldAccess {
        object: Box<AstNode>,
        field: String,
        through_pointer: bool, // `->` rather than `.`
        location: SourceLocation,
    },
    Call {
        callee: Box<AstNode>,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
    Unary {
        op: UnaryOp,
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    Binary {
        op: BinaryOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    Ternary {
        condition: Box<AstNode>,
        then_expr: Box<AstNode>,
        else_expr: Box<AstNode>,
        location: SourceLocation,
    },
    Cast {
        target_type: Box<AstNode>,
        value: Box<AstNode>,
        location: SourceLocation,
    },
    CompoundExpr {
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
    TypeOf {
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    SizeOf {
        operand: Box<AstNode>,
        location: SourceLocation,
    },

    // Statements
    Block {
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
    If {
        condition: Box<AstNode>,
        then_branch: Box<AstNode>,
        else_branch: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    Switch {
        scrutinee: Box<AstNode>,
        cases: Vec<AstNode>,
        location: SourceLocation,
    },
    Case {
        value: Box<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    Default {
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    While {
        condition: Box<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    DoWhile {
        body: Vec<AstNode>,
        condition: Box<AstNode>,
        location: SourceLocation,
    },
    For {
        init: Option<Box<AstNode>>,
        condition: Option<Box<AstNode>>,
        increment: Option<Box<AstNode>>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Return {
        value: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    Label {
        name: String,
        location: SourceLocation,
    },
    Jump {
        label: String,
        location: SourceLocation,
    },
    Try {
        body: Vec<AstNode>,
        catches: Vec<AstNode>,
        location: SourceLocation,
    },
    Catch {
        binding: Option<Box<AstNode>>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    Throw {
        value: Box<AstNode>,
        location: SourceLocation,
    },

    // Memory intrinsics
    Malloc {
        size: Box<AstNode>,
        location: SourceLocation,
    },
    Calloc {
        count: Box<AstNode>,
        size: Box<AstNode>,
        location: SourceLocation,
    },
    Realloc {
        pointer: Box<AstNode>,
        size: Box<AstNode>,
        location: SourceLocation,
    },
    Free {
        pointer: Box<AstNode>,
        location: SourceLocation,
    },
    Memcpy {
        dest: Box<AstNode>,
        src: Box<AstNode>,
        size: Box<AstNode>,
        location: SourceLocation,
    },
    Memset {
        dest: Box<AstNode>,
        value: Box<AstNode>,
        size: Box<AstNode>,
        location: SourceLocation,
    },
    Memmove {
        dest: Box<AstNode>,
        src: Box<AstNode>,
        size: Box<AstNode>,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Get the discriminant of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            AstNode::Identifier { .. } => NodeKind::Identifier,
            AstNode::Literal { .. } => NodeKind::Literal,
            AstNode::Primitive { .. } => NodeKind::Primitive,
            AstNode::Void { .. } => NodeKind::Void,
            AstNode::Null { .. } => NodeKind::Null,
            AstNode::Pointer { .. } => NodeKind::Pointer,
            AstNode::Array { .. } => NodeKind::Array,
            AstNode::Struct { .. } => NodeKind::Struct,
            AstNode::Union { .. } => NodeKind::Union,
            AstNode::Enum { .. } => NodeKind::Enum,
            AstNode::Typedef { .. } => NodeKind::Typedef,
            AstNode::TypeName { .. } => NodeKind::TypeName,
            AstNode::Declaration { .. } => NodeKind::Declaration,
            AstNode::Function { .. } => NodeKind::Function,
            AstNode::Impl { .. } => NodeKind::Impl,
            AstNode::Lambda { .. } => NodeKind::Lambda,
            AstNode::Assignment { .. } => NodeKind::Assignment,
            AstNode::ArrayAccess { .. } => NodeKind::ArrayAccess,
            AstNode::FieldAccess { .. } => NodeKind::FieldAccess,
            AstNode::Call { .. } => NodeKind::Call,
            AstNode::Unary { .. } => NodeKind::Unary,
            AstNode::Binary { .. } => NodeKind::Binary,
            AstNode::Ternary { .. } => NodeKind::Ternary,
            AstNode::Cast { .. } => NodeKind::Cast,
            AstNode::CompoundExpr { .. } => NodeKind::CompoundExpr,
            AstNode::TypeOf { .. } => NodeKind::TypeOf,
            AstNode::SizeOf { .. } => NodeKind::SizeOf,
            AstNode::Block { .. } => NodeKind::Block,
            AstNode::If { .. } => NodeKind::If,
            AstNode::Switch { .. } => NodeKind::Switch,
            AstNode::Case { .. } => NodeKind::Case,
            AstNode::Default { .. } => NodeKind::Default,
            AstNode::While { .. } => NodeKind::While,
            AstNode::DoWhile { .. } => NodeKind::DoWhile,
            AstNode::For { .. } => NodeKind::For,
            AstNode::Break { .. } => NodeKind::Break,
            AstNode::Continue { .. } => NodeKind::Continue,
            AstNode::Return { .. } => NodeKind::Return,
            AstNode::Label { .. } => NodeKind::Label,
            AstNode::Jump { .. } => NodeKind::Jump,
            AstNode::Try { .. } => NodeKind::Try,
            AstNode::Catch { .. } => NodeKind::Catch,
            AstNode::Throw { .. } => NodeKind::Throw,
            AstNode::Malloc { .. } => NodeKind::Malloc,
            AstNode::Calloc { .. } => NodeKind::Calloc,
            AstNode::Realloc { .. } => NodeKind::Realloc,
            AstNode::Free { .. } => NodeKind::Free,
            AstNode::Memcpy { .. } => NodeKind::Memcpy,
            AstNode::Memset { .. } => NodeKind::Memset,
            AstNode::Memmove { .. } => NodeKind::Memmove,
        }
    }

    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            AstNode::Identifier { location, .. }
            | AstNode::Literal { location, .. }
            | AstNode::Primitive { location, .. }
            | AstNode::Void { location }
            | AstNode::Null { location, .. }
            | AstNode::Pointer { location, .. }
            | AstNode::Array { location, .. }
            | AstNode::Struct { location, .. }
            | AstNode::Union { location, .. }
            | AstNode::Enum { location, .. }
            | AstNode::Typedef { location, .. }
            | AstNode::TypeName { location, .. }
            | AstNode::Declaration { location, .. }
            | AstNode::Function { location, .. }
            | AstNode::Impl { location, .. }
            | AstNode::Lambda { location, .. }
            | AstNode::Assignment { location, .. }
            | AstNode::ArrayAccess { location, .. }
            | AstNode::FieldAccess { location, .. }
            | AstNode::Call { location, .. }
            | AstNode::Unary { location, .. }
            | AstNode::Binary { location, .. }
            | AstNode::Ternary { location, .. }
            | AstNode::Cast { location, .. }
            | AstNode::CompoundExpr { location, .. }
            | AstNode::TypeOf { location, .. }
            | AstNode::SizeOf { location, .. }
            | AstNode::Block { location, .. }
            | AstNode::If { location, .. }
            | AstNode::Switch { location, .. }
            | AstNode::Case { location, .. }
            | AstNode::Default { location, .. }
            | AstNode::While { location, .. }
            | AstNode::DoWhile { location, .. }
            | AstNode::For { location, .. }
            | AstNode::Break { location }
            | AstNode::Continue { location }
            | AstNode::Return { location, .. }
            | AstNode::Label { location, .. }
            | AstNode::Jump { location, .. }
            | AstNode::Try { location, .. }
            | AstNode::Catch { location, .. }
            | AstNode::Throw { location, .. }
            | AstNode::Malloc { location, .. }
            | AstNode::Calloc { location, .. }
            | AstNode::Realloc { location, .. }
            | AstNode::Free { location, .. }
            | AstNode::Memcpy { location, .. }
            | AstNode::Memset { location, .. }
            | AstNode::Memmove { location, .. } => *location,
        }
    }

    /// True for nodes that name a type rather than compute a value
    pub fn is_type(&self) -> bool {
        matches!(
            self.kind(),
            NodeKind::Primitive
                | NodeKind::Void
                | NodeKind::Pointer
                | NodeKind::Array
                | NodeKind::TypeName
        )
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub items: Vec<AstNode>, // Functions, globals, type definitions and impl blocks, in source order
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_types() {
        assert_eq!(Literal::Int(1).primitive_type(), PrimitiveType::Int);
        assert_eq!(Literal::ULong(1).primitive_type(), PrimitiveType::ULong);
        assert_eq!(Literal::LongDouble(1.5).primitive_type(), PrimitiveType::LongDouble);
        assert_eq!(Literal::String("s".into()).primitive_type().name(), "string");
        assert_eq!(Literal::Char(b'a' as i8).primitive_type().name(), "char");
    }

    #[test]
    fn test_literal_integer_values() {
        assert_eq!(Literal::UChar(200).as_i64(), Some(200));
        assert_eq!(Literal::ULong(u64::MAX).as_i64(), None);
        assert_eq!(Literal::Double(1.0).as_i64(), None);
    }

    #[test]
    fn test_storage_flags() {
        let mut flags = StorageFlags::empty();
        assert!(flags.is_empty());
        assert_eq!(flags.bits(), 0);

        flags.insert(StorageFlags::EXTERN);
        flags.insert(StorageFlags::CONST);
        assert_eq!(flags.bits(), 0b101);
        assert!(flags.contains(StorageFlags::CONST.with(StorageFlags::EXTERN)));
        assert!(!flags.contains(StorageFlags::STATIC));
        assert_eq!(flags.to_string(), "const extern");
    }
}
