//! Declaration parsing implementation
//!
//! This module handles everything that introduces a name:
//!
//! - Variable declarations: `static const int x = 42;`, `int m[2][3];`
//! - Function definitions and prototypes: `type name(params) { ... }`
//! - Struct/union definitions: `struct Name { fields };`
//! - Enum definitions: `enum Color { RED, GREEN = 5, BLUE };`
//! - Typedefs: `typedef struct Point Point;`
//! - Method blocks: `impl Name { functions }`
//! - Type expressions: base types, pointers, arrays
//!
//! # Grammar
//!
//! ```text
//! item        ::= typedef | impl | declaration
//! declaration ::= storage* (tagged_def ";" | type declarator)
//! declarator  ::= identifier ( "(" params ")" (";" | block)
//!                            | dims ["=" initializer] ";" )
//! tagged_def  ::= ("struct" | "union" | "enum") identifier "{" ... "}"
//! type        ::= base_type "*"*
//! dims        ::= ("[" [expr] "]")*
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::parse::{storage_flag, Parser};
use crate::parser::token::TokenKind;

impl Parser<'_> {
    /// Parse a top-level item
    pub(crate) fn parse_top_level(&mut self) -> Result<AstNode, ParseError> {
        match self.current.kind {
            TokenKind::Typedef => self.parse_typedef(),
            TokenKind::Impl => self.parse_impl(),
            _ if self.starts_declaration() => self.parse_declaration(true),
            _ => Err(self.error(
                ParseErrorKind::UnexpectedToken,
                format!("Expected declaration, found {}", self.current),
            )),
        }
    }

    /// Parse a declaration. Function definitions are only accepted when
    /// `allow_functions` is set.
    pub(crate) fn parse_declaration(&mut self, allow_functions: bool) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        let storage = self.parse_storage_flags()?;

        let base = match self.current.kind {
            TokenKind::Struct | TokenKind::Union | TokenKind::Enum => {
                let tagged = self.parse_tagged_type()?;
                if !tagged.is_type() {
                    // A definition rather than a reference to one
                    self.expect_semicolon("after type definition")?;
                    return Ok(tagged);
                }
                tagged
            }
            _ => self.parse_base_type()?,
        };

        let ty = self.parse_pointers(base)?;
        let name = self.expect_identifier("in declaration")?;

        if self.check(TokenKind::LParen) {
            if !allow_functions {
                return Err(self.error(
                    ParseErrorKind::UnexpectedToken,
                    format!("Function '{}' cannot be defined here", name),
                ));
            }
            return self.parse_function_rest(ty, &name, storage, loc);
        }

        self.parse_variable_rest(ty, &name, storage, loc)
    }

    /// Parse leading storage qualifiers, in any order
    pub(crate) fn parse_storage_flags(&mut self) -> Result<StorageFlags, ParseError> {
        let mut storage = StorageFlags::empty();
        while let Some(flag) = storage_flag(self.current.kind) {
            self.advance()?;
            storage.insert(flag);
        }
        Ok(storage)
    }

    /// Everything after the name of a variable: array dimensions, an
    /// optional initializer and the closing semicolon
    fn parse_variable_rest(
        &mut self,
        ty: AstNode,
        name: &str,
        storage: StorageFlags,
        loc: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        let dims = self.parse_array_dims()?;

        let mut initializer = None;
        let mut elements = Vec::new();
        if self.match_token(TokenKind::Assign)? {
            if self.check(TokenKind::LBrace) {
                if dims.is_empty() {
                    return Err(self.error(
                        ParseErrorKind::InvalidInitializer,
                        format!("Initializer list for non-array '{}'", name),
                    ));
                }
                elements = self.parse_initializer_list()?;
            } else {
                initializer = Some(self.parse_expression()?);
            }
        }

        self.expect_semicolon("after variable declaration")?;

        let var_type = wrap_array_dims(ty, dims, elements);
        Ok(AstNode::declaration(var_type, name, initializer, storage, loc))
    }

    /// Parse `[N]` / `[]` suffixes after a declarator name
    fn parse_array_dims(&mut self) -> Result<Vec<(Option<AstNode>, SourceLocation)>, ParseError> {
        let mut dims = Vec::new();
        while self.check(TokenKind::LBracket) {
            let loc = self.advance()?.location;
            if self.match_token(TokenKind::RBracket)? {
                dims.push((None, loc));
            } else {
                let size = self.parse_expression()?;
                self.expect_token(TokenKind::RBracket, "Expected ']' after array size")?;
                dims.push((Some(size), loc));
            }
        }
        Ok(dims)
    }

    /// Parse `{a, b, c}`; a trailing comma is allowed
    fn parse_initializer_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        self.expect_lbrace("to start initializer list")?;
        let mut elements = Vec::new();

        while !self.check(TokenKind::RBrace) {
            if self.check(TokenKind::LBrace) {
                return Err(self.error(
                    ParseErrorKind::InvalidInitializer,
                    "Nested initializer lists are not supported",
                ));
            }
            elements.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma)? {
                break;
            }
        }

        self.expect_rbrace("after initializer list")?;
        Ok(elements)
    }

    /// Everything after the name of a function: parameters, then a body or
    /// `;` for a prototype
    fn parse_function_rest(
        &mut self,
        return_type: AstNode,
        name: &str,
        storage: StorageFlags,
        loc: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        self.expect_lparen("after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect_rparen("after parameters")?;

        let body = if self.match_token(TokenKind::Semicolon)? {
            None
        } else {
            self.expect_lbrace("before function body")?;
            let body = self.parse_block_statements()?;
            self.expect_rbrace("after function body")?;
            Some(body)
        };

        Ok(AstNode::function(name, return_type, params, body, storage, loc))
    }

    /// Parse parameter list: type name, type name, ... (without the
    /// parentheses). `void` alone and an empty list both mean no parameters.
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut params = Vec::new();

        if self.check(TokenKind::RParen) {
            return Ok(params);
        }

        if self.check(TokenKind::Void) {
            let void_loc = self.advance()?.location;
            if self.check(TokenKind::RParen) {
                return Ok(params);
            }
            // `void *p` and friends
            let base = AstNode::void(void_loc);
            params.push(self.parse_parameter(StorageFlags::empty(), base, void_loc)?);
            if !self.match_token(TokenKind::Comma)? {
                return Ok(params);
            }
        }

        loop {
            let loc = self.current_location();
            let storage = self.parse_storage_flags()?;
            let base = self.parse_base_type()?;
            params.push(self.parse_parameter(storage, base, loc)?);

            if !self.match_token(TokenKind::Comma)? {
                break;
            }
        }

        Ok(params)
    }

    fn parse_parameter(
        &mut self,
        storage: StorageFlags,
        base: AstNode,
        loc: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        let ty = self.parse_pointers(base)?;
        let name = self.expect_identifier("for parameter")?;
        let dims = self.parse_array_dims()?;
        let ty = wrap_array_dims(ty, dims, Vec::new());
        Ok(AstNode::declaration(ty, &name, None, storage, loc))
    }

    /// Parse `typedef type Alias;` and remember the alias
    fn parse_typedef(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.expect_token(TokenKind::Typedef, "Expected 'typedef'")?.location;

        let original = match self.current.kind {
            TokenKind::Struct | TokenKind::Union | TokenKind::Enum => self.parse_tagged_type()?,
            _ => self.parse_base_type()?,
        };
        let original = self.parse_pointers(original)?;
        let alias = self.expect_identifier("for typedef name")?;
        self.expect_semicolon("after typedef")?;

        self.register_typedef(&alias);
        Ok(AstNode::typedef(&alias, original, loc))
    }

    /// Parse `impl Name { methods }`
    fn parse_impl(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.expect_token(TokenKind::Impl, "Expected 'impl'")?.location;
        let struct_name = self.expect_identifier("after 'impl'")?;
        self.expect_lbrace("after impl name")?;

        let mut methods = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let method_loc = self.current_location();
            let method = self.parse_declaration(true)?;
            if method.kind() != NodeKind::Function {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken,
                    format!("Expected method definition in impl '{}'", struct_name),
                    method_loc,
                ));
            }
            methods.push(method);
        }

        self.expect_rbrace("after impl body")?;
        self.match_token(TokenKind::Semicolon)?;
        Ok(AstNode::impl_block(&struct_name, methods, loc))
    }

    /// Parse `struct|union|enum Name`, followed by a body when this is a
    /// definition. Returns a [`AstNode::TypeName`] for a plain reference.
    fn parse_tagged_type(&mut self) -> Result<AstNode, ParseError> {
        let keyword = self.advance()?;
        let loc = keyword.location;
        let name = self.expect_identifier(&format!("after '{}'", keyword.kind.spelling()))?;

        let tag = match keyword.kind {
            TokenKind::Struct => TypeTag::Struct,
            TokenKind::Union => TypeTag::Union,
            _ => TypeTag::Enum,
        };

        if !self.check(TokenKind::LBrace) {
            return Ok(AstNode::type_name(tag, &name, loc));
        }

        match tag {
            TypeTag::Enum => self.parse_enum_body(&name, loc),
            TypeTag::Union => {
                let fields = self.parse_field_list()?;
                Ok(AstNode::union_def(&name, fields, loc))
            }
            _ => {
                let fields = self.parse_field_list()?;
                Ok(AstNode::struct_def(&name, fields, loc))
            }
        }
    }

    /// Parse `{ type name; ... }` for a struct or union
    fn parse_field_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        self.expect_lbrace("to start field list")?;

        let mut fields = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let loc = self.current_location();
            let storage = self.parse_storage_flags()?;
            let base = match self.current.kind {
                TokenKind::Struct | TokenKind::Union | TokenKind::Enum => {
                    let tagged = self.parse_tagged_type()?;
                    if !tagged.is_type() {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedToken,
                            "Nested type definitions are not supported in fields",
                            loc,
                        ));
                    }
                    tagged
                }
                _ => self.parse_base_type()?,
            };
            let ty = self.parse_pointers(base)?;
            let name = self.expect_identifier("for field")?;
            let dims = self.parse_array_dims()?;
            self.expect_semicolon("after field")?;

            let ty = wrap_array_dims(ty, dims, Vec::new());
            fields.push(AstNode::declaration(ty, &name, None, storage, loc));
        }

        self.expect_rbrace("after fields")?;
        Ok(fields)
    }

    /// Parse `{ A, B = 5, C = -1 }`. Values without an explicit number
    /// continue from the previous one.
    fn parse_enum_body(&mut self, name: &str, loc: SourceLocation) -> Result<AstNode, ParseError> {
        self.expect_lbrace("to start enum body")?;

        let mut members = Vec::new();
        let mut next: i64 = 0;

        while !self.check(TokenKind::RBrace) {
            let value_name = self.expect_identifier("for enum value")?;
            if self.match_token(TokenKind::Assign)? {
                next = self.parse_enum_value()?;
            }
            members.push((value_name, next));
            next = next.wrapping_add(1);

            if !self.match_token(TokenKind::Comma)? {
                break;
            }
        }

        self.expect_rbrace("after enum values")?;

        let members: Vec<(&str, i64)> = members.iter().map(|(n, v)| (n.as_str(), *v)).collect();
        Ok(AstNode::enum_def(name, &members, loc))
    }

    /// An explicit enum value: an integer literal, optionally negated
    fn parse_enum_value(&mut self) -> Result<i64, ParseError> {
        let negative = self.match_token(TokenKind::Minus)?;
        let value = self.current.literal().and_then(Literal::as_i64);

        let Some(value) = value.filter(|_| self.check(TokenKind::Number)) else {
            return Err(self.error(
                ParseErrorKind::InvalidEnumValue,
                format!("Expected integer enum value, found {}", self.current),
            ));
        };
        self.advance()?;
        Ok(if negative { -value } else { value })
    }

    /// Parse a base type keyword or name, without pointers
    pub(crate) fn parse_base_type(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        let ty = match self.current.kind {
            TokenKind::Bool => PrimitiveType::Bool,
            TokenKind::Byte => PrimitiveType::Byte,
            TokenKind::Short => PrimitiveType::Short,
            TokenKind::UShort => PrimitiveType::UShort,
            TokenKind::Int => PrimitiveType::Int,
            TokenKind::UInt => PrimitiveType::UInt,
            TokenKind::Long => {
                self.advance()?;
                let ty = if self.match_token(TokenKind::Long)? {
                    PrimitiveType::LongLong
                } else if self.match_token(TokenKind::Double)? {
                    PrimitiveType::LongDouble
                } else {
                    PrimitiveType::Long
                };
                return Ok(AstNode::primitive(ty, loc));
            }
            TokenKind::ULong => {
                self.advance()?;
                let ty = if self.match_token(TokenKind::Long)? {
                    PrimitiveType::ULongLong
                } else {
                    PrimitiveType::ULong
                };
                return Ok(AstNode::primitive(ty, loc));
            }
            TokenKind::Float => PrimitiveType::Float,
            TokenKind::Double => PrimitiveType::Double,
            TokenKind::SChar => PrimitiveType::SChar,
            TokenKind::Char => PrimitiveType::Char,
            TokenKind::UChar => PrimitiveType::UChar,
            TokenKind::String => PrimitiveType::String,
            TokenKind::Arch => PrimitiveType::Arch,
            TokenKind::UArch => PrimitiveType::UArch,
            TokenKind::Void | TokenKind::Fun => {
                self.advance()?;
                return Ok(AstNode::void(loc));
            }
            TokenKind::Struct | TokenKind::Union | TokenKind::Enum => {
                let keyword = self.advance()?;
                let name = self.expect_identifier(&format!("after '{}'", keyword.kind.spelling()))?;
                let tag = match keyword.kind {
                    TokenKind::Struct => TypeTag::Struct,
                    TokenKind::Union => TypeTag::Union,
                    _ => TypeTag::Enum,
                };
                return Ok(AstNode::type_name(tag, &name, loc));
            }
            TokenKind::Identifier if self.starts_type() => {
                let name = self.expect_identifier("for type name")?;
                return Ok(AstNode::type_name(TypeTag::Typedef, &name, loc));
            }
            _ => {
                return Err(self.error(
                    ParseErrorKind::ExpectedType,
                    format!("Expected type, found {}", self.current),
                ))
            }
        };

        self.advance()?;
        Ok(AstNode::primitive(ty, loc))
    }

    /// Wrap `base` in one pointer level per `*`
    pub(crate) fn parse_pointers(&mut self, mut base: AstNode) -> Result<AstNode, ParseError> {
        while self.check(TokenKind::Star) {
            let loc = self.advance()?.location;
            base = AstNode::pointer(base, loc);
        }
        Ok(base)
    }

    /// Parse a full type: base type plus pointers
    pub(crate) fn parse_type(&mut self) -> Result<AstNode, ParseError> {
        let base = self.parse_base_type()?;
        self.parse_pointers(base)
    }
}

/// Apply C-style array dimensions to an element type.
///
/// `int m[2][3]` is an array of 2 arrays of 3 ints, so the last dimension
/// wraps first. Initializer elements belong to the outermost array.
fn wrap_array_dims(
    mut ty: AstNode,
    dims: Vec<(Option<AstNode>, SourceLocation)>,
    elements: Vec<AstNode>,
) -> AstNode {
    let mut elements = Some(elements);
    for (i, (size, loc)) in dims.into_iter().enumerate().rev() {
        let items = if i == 0 {
            elements.take().unwrap_or_default()
        } else {
            Vec::new()
        };
        ty = AstNode::array(ty, size, items, loc);
    }
    ty
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::error::ParseErrorKind;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::Parser;

    fn items(source: &str) -> Vec<AstNode> {
        let mut lexer = Lexer::new(source);
        let mut parser = Parser::new(&mut lexer).unwrap();
        parser.parse_program().unwrap().items
    }

    fn err(source: &str) -> ParseErrorKind {
        let mut lexer = Lexer::new(source);
        let mut parser = Parser::new(&mut lexer).unwrap();
        parser.parse_program().unwrap_err().kind
    }

    #[test]
    fn test_storage_flags_any_order() {
        let items = items("static const int a = 1; const static int b = 2;");
        for item in &items {
            match item {
                AstNode::Declaration { storage, .. } => {
                    assert!(storage.contains(StorageFlags::STATIC));
                    assert!(storage.contains(StorageFlags::CONST));
                    assert!(!storage.contains(StorageFlags::EXTERN));
                }
                _ => panic!("Expected declaration"),
            }
        }
    }

    #[test]
    fn test_multi_word_types() {
        let items = items("long long a; ulong long b; long double c; long d;");
        let types: Vec<String> = items
            .iter()
            .map(|item| match item {
                AstNode::Declaration { var_type, .. } => var_type.to_string(),
                _ => panic!("Expected declaration"),
            })
            .collect();
        assert_eq!(types, ["long long", "ulong long", "long double", "long"]);
    }

    #[test]
    fn test_array_dimensions() {
        let items = items("int m[2][3];");
        match &items[0] {
            AstNode::Declaration { var_type, .. } => {
                assert_eq!(var_type.to_string(), "(array (array int 3) 2)");
            }
            _ => panic!("Expected declaration"),
        }
    }

    #[test]
    fn test_array_initializer_list() {
        let items = items("int a[] = {1, 2, 3,};");
        match &items[0] {
            AstNode::Declaration {
                var_type,
                initializer,
                ..
            } => {
                assert!(initializer.is_none());
                match &**var_type {
                    AstNode::Array { size, elements, .. } => {
                        assert!(size.is_none());
                        assert_eq!(elements.len(), 3);
                    }
                    _ => panic!("Expected array type"),
                }
            }
            _ => panic!("Expected declaration"),
        }
        assert_eq!(err("int x = {1};"), ParseErrorKind::InvalidInitializer);
    }

    #[test]
    fn test_enum_auto_increment() {
        let items = items("enum Color { RED, GREEN = 5, BLUE, DARK = -2, DARKER };");
        match &items[0] {
            AstNode::Enum {
                name,
                values,
                int_values,
                ..
            } => {
                assert_eq!(name, "Color");
                assert_eq!(values, &["RED", "GREEN", "BLUE", "DARK", "DARKER"]);
                assert_eq!(int_values, &[0, 5, 6, -2, -1]);
            }
            _ => panic!("Expected enum"),
        }
        assert_eq!(err("enum E { A = x };"), ParseErrorKind::InvalidEnumValue);
    }

    #[test]
    fn test_union_and_struct_reference() {
        let items = items("union Num { int i; float f; }; struct Point *origin;");
        assert_eq!(items[0].kind(), NodeKind::Union);
        match &items[1] {
            AstNode::Declaration { var_type, name, .. } => {
                assert_eq!(name, "origin");
                assert_eq!(var_type.to_string(), "(ptr (struct Point))");
            }
            _ => panic!("Expected declaration"),
        }
    }

    #[test]
    fn test_typedef_alias_starts_declaration() {
        let items = items("typedef struct Point Point; Point p; Point *q = null;");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].kind(), NodeKind::Typedef);
        match &items[2] {
            AstNode::Declaration {
                var_type,
                initializer,
                ..
            } => {
                assert_eq!(var_type.to_string(), "(ptr (typedef Point))");
                assert_eq!(initializer.as_ref().map(|i| i.kind()), Some(NodeKind::Null));
            }
            _ => panic!("Expected declaration"),
        }
    }

    #[test]
    fn test_prototype_and_params() {
        let items = items("extern int add(int a, const int *b); fun run(void); void take(void *p) {}");
        match &items[0] {
            AstNode::Function {
                params,
                body,
                storage,
                ..
            } => {
                assert!(body.is_none());
                assert_eq!(params.len(), 2);
                assert!(storage.contains(StorageFlags::EXTERN));
                assert_eq!(params[1].kind(), NodeKind::Declaration);
            }
            _ => panic!("Expected function"),
        }
        match &items[1] {
            AstNode::Function {
                params,
                return_type,
                ..
            } => {
                assert!(params.is_empty());
                assert_eq!(return_type.kind(), NodeKind::Void);
            }
            _ => panic!("Expected function"),
        }
        match &items[2] {
            AstNode::Function { params, body, .. } => {
                assert_eq!(params.len(), 1);
                assert_eq!(body.as_ref().map(Vec::len), Some(0));
            }
            _ => panic!("Expected function"),
        }
    }

    #[test]
    fn test_impl_block() {
        let items = items("impl Point { int norm(struct Point *self) { return 0; } }");
        match &items[0] {
            AstNode::Impl {
                struct_name,
                methods,
                ..
            } => {
                assert_eq!(struct_name, "Point");
                assert_eq!(methods.len(), 1);
            }
            _ => panic!("Expected impl"),
        }
        assert_eq!(err("impl Point { int x; }"), ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_expected_type() {
        assert_eq!(err("int f(42);"), ParseErrorKind::ExpectedType);
    }
}
