//! Parser implementation for Java declarations
//!
//! A recursive descent parser over the token stream. Declarations (types,
//! members, signatures, generics) are parsed structurally; statements inside
//! bodies are cut out of the source as raw fragments.

use super::{
    error::{ParseError, ParseResult},
    lexer::{Lexer, LexicalToken, Token},
};
use crate::ast::*;
use crate::consts::PARSER_MAX_LOOP_ITERS;
use crate::error::Result;

/// Parser for Java source
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<LexicalToken>,
    current: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser from source code
    pub fn new(source: &'a str) -> Result<Self> {
        let tokens = Lexer::new(source).tokenize().map_err(|message| ParseError::LexicalError {
            message,
            location: Location::default(),
        })?;

        Ok(Self {
            source,
            tokens,
            current: 0,
        })
    }

    /// Parse the source code into an AST
    pub fn parse(mut self) -> Result<Ast> {
        let start = self.current_location();

        let package_decl = if self.check(&Token::Package) {
            Some(self.parse_package_decl()?)
        } else {
            None
        };

        let mut imports = Vec::new();
        while self.check(&Token::Import) {
            imports.push(self.parse_import_decl()?);
        }

        let mut type_decls = Vec::new();
        while !self.is_at_end() {
            if self.match_token(&Token::Semicolon) {
                continue;
            }
            let type_decl = self.parse_type_decl()?;
            log::debug!("parsed {}", type_decl);
            type_decls.push(type_decl);
        }

        Ok(Ast {
            package_decl,
            imports,
            type_decls,
            span: Span::new(start, self.previous_end()),
        })
    }

    // Helper methods
    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek_token_type(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx).map(|t| t.token_type())
    }

    fn check(&self, token_type: &Token) -> bool {
        self.peek_token_type(self.current) == Some(token_type)
    }

    fn check_at(&self, ahead: usize, token_type: &Token) -> bool {
        self.peek_token_type(self.current + ahead) == Some(token_type)
    }

    /// Identifier with the given text, for contextual keywords like `record`
    fn check_word(&self, ahead: usize, word: &str) -> bool {
        self.tokens
            .get(self.current + ahead)
            .map_or(false, |t| t.is(&Token::Identifier) && t.lexeme() == word)
    }

    fn bump(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn match_token(&mut self, token_type: &Token) -> bool {
        if self.check(token_type) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, token_type: &Token, expected: &str) -> ParseResult<()> {
        if self.check(token_type) {
            self.bump();
            Ok(())
        } else {
            Err(self.error_expected(expected))
        }
    }

    fn error_expected(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.current) {
            Some(token) => ParseError::unexpected_token(expected, token.lexeme(), token.location()),
            None => ParseError::unexpected_end_of_input(expected, self.previous_end()),
        }
    }

    fn current_location(&self) -> Location {
        match self.tokens.get(self.current) {
            Some(token) => token.location(),
            None => self.previous_end(),
        }
    }

    /// Location just past the most recently consumed token
    fn previous_end(&self) -> Location {
        match self.current.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => {
                let start = token.location();
                Location::new(start.line, start.column + token.lexeme().chars().count(), token.end_offset())
            }
            None => Location::new(1, 1, 0),
        }
    }

    /// Source text covering tokens `start..end`
    fn fragment(&self, start: usize, end: usize) -> Fragment {
        let first = &self.tokens[start];
        let last = &self.tokens[end - 1];
        Fragment {
            text: self.source[first.location().offset..last.end_offset()].to_string(),
            span: Span::new(first.location(), last.location()),
        }
    }

    // Package declaration parsing
    fn parse_package_decl(&mut self) -> ParseResult<PackageDecl> {
        let start = self.current_location();

        self.consume(&Token::Package, "'package'")?;
        let name = self.parse_qualified_name()?;
        self.consume(&Token::Semicolon, "';' after package name")?;

        Ok(PackageDecl {
            name,
            span: Span::new(start, self.previous_end()),
        })
    }

    // Import declaration parsing
    fn parse_import_decl(&mut self) -> ParseResult<ImportDecl> {
        let start = self.current_location();

        self.consume(&Token::Import, "'import'")?;
        let is_static = self.match_token(&Token::Static);

        // Qualified name, stopping before a trailing `.*`
        let mut parts = vec![self.parse_identifier()?];
        while self.check(&Token::Dot) && self.check_at(1, &Token::Identifier) {
            self.bump();
            parts.push(self.parse_identifier()?);
        }
        let mut is_wildcard = false;
        if self.match_token(&Token::Dot) {
            self.consume(&Token::Star, "'*' after '.' in import")?;
            is_wildcard = true;
        }

        self.consume(&Token::Semicolon, "';' after import")?;

        Ok(ImportDecl {
            name: parts.join("."),
            is_static,
            is_wildcard,
            span: Span::new(start, self.previous_end()),
        })
    }

    // Type declaration parsing
    fn parse_type_decl(&mut self) -> ParseResult<TypeDecl> {
        let start = self.current_location();
        let (modifiers, annotations) = self.parse_prefix()?;
        self.parse_type_decl_after_prefix(modifiers, annotations, start)
    }

    fn starts_type_decl(&self) -> bool {
        self.check(&Token::Class)
            || self.check(&Token::Interface)
            || self.check(&Token::Enum)
            || (self.check(&Token::At) && self.check_at(1, &Token::Interface))
            || (self.check_word(0, "record") && self.check_at(1, &Token::Identifier))
    }

    fn parse_type_decl_after_prefix(
        &mut self,
        modifiers: ModifierSet,
        annotations: Vec<Annotation>,
        start: Location,
    ) -> ParseResult<TypeDecl> {
        if self.check(&Token::Class) {
            return Ok(TypeDecl::Class(self.parse_class_decl(modifiers, annotations, start)?));
        }
        if self.check(&Token::Interface) {
            return Ok(TypeDecl::Interface(self.parse_interface_decl(modifiers, annotations, start)?));
        }

        let kind = if self.match_token(&Token::Enum) {
            OpaqueKind::Enum
        } else if self.check(&Token::At) && self.check_at(1, &Token::Interface) {
            self.bump();
            self.bump();
            OpaqueKind::Annotation
        } else if self.check_word(0, "record") {
            self.bump();
            OpaqueKind::Record
        } else {
            return Err(self.error_expected("type declaration"));
        };

        let name = self.parse_identifier()?;
        self.skip_to_body()?;
        self.skip_balanced_braces()?;

        Ok(TypeDecl::Opaque(OpaqueTypeDecl {
            kind,
            modifiers,
            annotations,
            name,
            span: Span::new(start, self.previous_end()),
        }))
    }

    // Class declaration parsing
    fn parse_class_decl(
        &mut self,
        modifiers: ModifierSet,
        annotations: Vec<Annotation>,
        start: Location,
    ) -> ParseResult<ClassDecl> {
        self.consume(&Token::Class, "'class'")?;

        let name = self.parse_identifier()?;

        let type_params = if self.check(&Token::Lt) {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };

        let extends = if self.match_token(&Token::Extends) {
            Some(self.parse_type_ref()?)
        } else {
            None
        };

        let implements = if self.match_token(&Token::Implements) {
            self.parse_type_list()?
        } else {
            Vec::new()
        };

        self.skip_permits_clause()?;

        let body = self
            .parse_class_body()
            .map_err(|e| e.with_context(&format!("class {}", name)))?;

        Ok(ClassDecl {
            modifiers,
            annotations,
            name,
            type_params,
            extends,
            implements,
            body,
            span: Span::new(start, self.previous_end()),
        })
    }

    fn parse_interface_decl(
        &mut self,
        modifiers: ModifierSet,
        annotations: Vec<Annotation>,
        start: Location,
    ) -> ParseResult<InterfaceDecl> {
        self.consume(&Token::Interface, "'interface'")?;
        let name = self.parse_identifier()?;

        let type_params = if self.check(&Token::Lt) {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };

        let extends = if self.match_token(&Token::Extends) {
            self.parse_type_list()?
        } else {
            Vec::new()
        };

        self.skip_permits_clause()?;

        let mut body = self
            .parse_class_body()
            .map_err(|e| e.with_context(&format!("interface {}", name)))?;
        apply_implicit_interface_modifiers(&mut body);

        Ok(InterfaceDecl {
            modifiers,
            annotations,
            name,
            type_params,
            extends,
            body,
            span: Span::new(start, self.previous_end()),
        })
    }

    fn skip_permits_clause(&mut self) -> ParseResult<()> {
        if self.check_word(0, "permits") {
            self.bump();
            self.parse_type_list()?;
        }
        Ok(())
    }

    /// Skip a type header (type parameters, record components, supertypes) up to its `{`
    fn skip_to_body(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            match self.peek_token_type(self.current).cloned() {
                None => return Err(self.error_expected("'{' to open type body")),
                Some(Token::LBrace) if depth == 0 => return Ok(()),
                Some(Token::LParen) | Some(Token::Lt) => depth += 1,
                Some(Token::RParen) | Some(Token::Gt) => depth = depth.saturating_sub(1),
                Some(_) => {}
            }
            self.bump();
        }
    }

    fn skip_balanced_braces(&mut self) -> ParseResult<()> {
        self.consume(&Token::LBrace, "'{'")?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek_token_type(self.current).cloned() {
                None => return Err(self.error_expected("'}'")),
                Some(Token::LBrace) => depth += 1,
                Some(Token::RBrace) => depth -= 1,
                Some(_) => {}
            }
            self.bump();
        }
        Ok(())
    }

    // Helper parsing methods
    /// Modifiers and annotations in any order, as Java allows them to interleave
    fn parse_prefix(&mut self) -> ParseResult<(ModifierSet, Vec<Annotation>)> {
        let mut modifiers = ModifierSet::empty();
        let mut annotations = Vec::new();

        loop {
            if self.check(&Token::At) && !self.check_at(1, &Token::Interface) {
                annotations.push(self.parse_annotation()?);
            } else if let Some(modifier) = self.peek_modifier() {
                self.bump();
                modifiers = modifiers.with(modifier);
            } else if self.check_word(0, "sealed") {
                self.bump();
            } else if self.check_word(0, "non") && self.check_at(1, &Token::Operator) && self.check_word(2, "sealed") {
                self.current += 3;
            } else {
                break;
            }
        }

        Ok((modifiers, annotations))
    }

    fn peek_modifier(&self) -> Option<Modifier> {
        let modifier = match self.peek_token_type(self.current)? {
            Token::Public => Modifier::Public,
            Token::Protected => Modifier::Protected,
            Token::Private => Modifier::Private,
            Token::Abstract => Modifier::Abstract,
            Token::Default => Modifier::Default,
            Token::Static => Modifier::Static,
            Token::Final => Modifier::Final,
            Token::Transient => Modifier::Transient,
            Token::Volatile => Modifier::Volatile,
            Token::Synchronized => Modifier::Synchronized,
            Token::Native => Modifier::Native,
            Token::Strictfp => Modifier::Strictfp,
            _ => return None,
        };
        Some(modifier)
    }

    fn parse_annotation(&mut self) -> ParseResult<Annotation> {
        let start = self.current_location();
        self.consume(&Token::At, "'@'")?;
        let name = self.parse_qualified_name()?;

        let mut arguments = Vec::new();
        if self.match_token(&Token::LParen) {
            if !self.check(&Token::RParen) {
                loop {
                    let stop = |p: &Parser<'_>, i: usize| matches!(p.peek_token_type(i), Some(Token::Comma));
                    if self.check(&Token::Identifier) && self.check_at(1, &Token::Assign) {
                        let key = self.parse_identifier()?;
                        self.bump();
                        let value = self.scan_raw("annotation value", stop)?;
                        arguments.push(AnnotationArg::Named(key, value.text));
                    } else {
                        let value = self.scan_raw("annotation value", stop)?;
                        arguments.push(AnnotationArg::Value(value.text));
                    }
                    if !self.match_token(&Token::Comma) {
                        break;
                    }
                }
            }
            self.consume(&Token::RParen, "')' after annotation arguments")?;
        }

        Ok(Annotation {
            name,
            arguments,
            span: Span::new(start, self.previous_end()),
        })
    }

    fn skip_type_annotations(&mut self) -> ParseResult<()> {
        while self.check(&Token::At) && !self.check_at(1, &Token::Interface) {
            self.parse_annotation()?;
        }
        Ok(())
    }

    fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.tokens.get(self.current) {
            Some(token) if token.is(&Token::Identifier) => {
                let name = token.lexeme().to_string();
                self.bump();
                Ok(name)
            }
            _ => Err(self.error_expected("identifier")),
        }
    }

    fn parse_qualified_name(&mut self) -> ParseResult<String> {
        let mut parts = vec![self.parse_identifier()?];

        while self.check(&Token::Dot) && self.check_at(1, &Token::Identifier) {
            self.bump();
            parts.push(self.parse_identifier()?);
        }

        Ok(parts.join("."))
    }

    fn parse_type_parameters(&mut self) -> ParseResult<Vec<TypeParam>> {
        self.consume(&Token::Lt, "'<' for type parameters")?;

        let mut params = Vec::new();
        loop {
            self.skip_type_annotations()?;
            let start = self.current_location();
            let name = self.parse_identifier()?;

            let mut bounds = Vec::new();
            if self.match_token(&Token::Extends) {
                loop {
                    bounds.push(self.parse_type_ref()?);
                    if !self.match_token(&Token::Amp) {
                        break;
                    }
                }
            }

            params.push(TypeParam {
                name,
                bounds,
                span: Span::new(start, self.previous_end()),
            });

            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.consume(&Token::Gt, "'>' after type parameters")?;
        Ok(params)
    }

    fn parse_type_ref(&mut self) -> ParseResult<TypeRef> {
        self.skip_type_annotations()?;
        let start = self.current_location();

        let (name, type_args, enclosing) = match self.tokens.get(self.current) {
            Some(token) if token.token_type().is_primitive_type() => {
                let name = token.lexeme().to_string();
                self.bump();
                (name, Vec::new(), None)
            }
            Some(token) if token.is(&Token::Identifier) => {
                let mut name = self.parse_identifier()?;
                let mut type_args = Vec::new();
                let mut enclosing: Option<Box<TypeRef>> = None;
                loop {
                    if self.check(&Token::Lt) {
                        type_args = self.parse_type_arguments()?;
                    }
                    if self.check(&Token::Dot) && self.check_at(1, &Token::Identifier) {
                        let prefix_end = self.previous_end();
                        self.bump();
                        let segment = self.parse_identifier()?;
                        if type_args.is_empty() {
                            name.push('.');
                            name.push_str(&segment);
                        } else {
                            // `Outer<A>.Inner`: the parameterized prefix becomes the enclosing type
                            enclosing = Some(Box::new(TypeRef {
                                name: std::mem::replace(&mut name, segment),
                                type_args: std::mem::take(&mut type_args),
                                array_dims: 0,
                                enclosing: enclosing.take(),
                                span: Span::new(start, prefix_end),
                            }));
                        }
                    } else {
                        break;
                    }
                }
                (name, type_args, enclosing)
            }
            _ => return Err(self.error_expected("type")),
        };

        let mut array_dims = 0;
        loop {
            self.skip_type_annotations()?;
            if self.check(&Token::LBracket) && self.check_at(1, &Token::RBracket) {
                self.current += 2;
                array_dims += 1;
            } else {
                break;
            }
        }

        Ok(TypeRef {
            name,
            type_args,
            array_dims,
            enclosing,
            span: Span::new(start, self.previous_end()),
        })
    }

    fn parse_type_arguments(&mut self) -> ParseResult<Vec<TypeArg>> {
        self.consume(&Token::Lt, "'<' for type arguments")?;

        let mut args = Vec::new();
        if self.match_token(&Token::Gt) {
            return Ok(args);
        }

        loop {
            self.skip_type_annotations()?;
            if self.check(&Token::Question) {
                let start = self.current_location();
                self.bump();
                let bound = if self.match_token(&Token::Extends) {
                    Some((BoundKind::Extends, self.parse_type_ref()?))
                } else if self.match_token(&Token::Super) {
                    Some((BoundKind::Super, self.parse_type_ref()?))
                } else {
                    None
                };
                args.push(TypeArg::Wildcard(WildcardType {
                    bound,
                    span: Span::new(start, self.previous_end()),
                }));
            } else {
                args.push(TypeArg::Type(self.parse_type_ref()?));
            }

            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.consume(&Token::Gt, "'>' after type arguments")?;
        Ok(args)
    }

    fn parse_type_list(&mut self) -> ParseResult<Vec<TypeRef>> {
        let mut types = Vec::new();

        loop {
            types.push(self.parse_type_ref()?);

            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        Ok(types)
    }

    // Member parsing
    fn parse_class_body(&mut self) -> ParseResult<Vec<ClassMember>> {
        self.consume(&Token::LBrace, "'{' to open class body")?;

        let mut members = Vec::new();
        while !self.check(&Token::RBrace) {
            if self.is_at_end() {
                return Err(self.error_expected("'}' to close class body"));
            }
            if self.match_token(&Token::Semicolon) {
                continue;
            }
            members.extend(self.parse_class_member()?);
        }

        self.consume(&Token::RBrace, "'}' to close class body")?;
        Ok(members)
    }

    fn parse_class_member(&mut self) -> ParseResult<Vec<ClassMember>> {
        let start = self.current_location();

        // Initializer blocks
        if self.check(&Token::LBrace) || (self.check(&Token::Static) && self.check_at(1, &Token::LBrace)) {
            let is_static = self.match_token(&Token::Static);
            let body = self.parse_block()?;
            return Ok(vec![ClassMember::Initializer(InitializerBlock {
                is_static,
                body,
                span: Span::new(start, self.previous_end()),
            })]);
        }

        let (modifiers, annotations) = self.parse_prefix()?;

        if self.starts_type_decl() {
            let type_decl = self.parse_type_decl_after_prefix(modifiers, annotations, start)?;
            return Ok(vec![ClassMember::TypeDecl(type_decl)]);
        }

        let type_params = if self.check(&Token::Lt) {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };

        // Constructor: Identifier followed by '('
        if self.check(&Token::Identifier) && self.check_at(1, &Token::LParen) {
            let ctor = self.parse_constructor_rest(modifiers, annotations, type_params, start)?;
            return Ok(vec![ClassMember::Constructor(ctor)]);
        }

        let type_ref = self.parse_type_ref()?;
        let name = self.parse_identifier()?;

        if self.check(&Token::LParen) {
            let method = self
                .parse_method_rest(modifiers, annotations, type_params, type_ref, name, start)
                .map_err(|e| e.with_context("method declaration"))?;
            return Ok(vec![ClassMember::Method(method)]);
        }

        if !type_params.is_empty() {
            return Err(self.error_expected("'(' after generic method name"));
        }

        self.parse_field_declarators(modifiers, annotations, type_ref, name, start)
    }

    fn parse_method_rest(
        &mut self,
        modifiers: ModifierSet,
        annotations: Vec<Annotation>,
        type_params: Vec<TypeParam>,
        mut return_type: TypeRef,
        name: String,
        start: Location,
    ) -> ParseResult<MethodDecl> {
        let parameters = self.parse_formal_parameters()?;

        // Legacy array syntax: `int values()[]`
        while self.check(&Token::LBracket) && self.check_at(1, &Token::RBracket) {
            self.current += 2;
            return_type.array_dims += 1;
        }

        let throws = if self.match_token(&Token::Throws) {
            self.parse_type_list()?
        } else {
            Vec::new()
        };

        let body = if self.check(&Token::LBrace) {
            Some(self.parse_block()?)
        } else {
            self.consume(&Token::Semicolon, "'{' or ';' after method declaration")?;
            None
        };

        Ok(MethodDecl {
            modifiers,
            annotations,
            type_params,
            return_type,
            name,
            parameters,
            throws,
            body,
            span: Span::new(start, self.previous_end()),
        })
    }

    fn parse_constructor_rest(
        &mut self,
        modifiers: ModifierSet,
        annotations: Vec<Annotation>,
        type_params: Vec<TypeParam>,
        start: Location,
    ) -> ParseResult<ConstructorDecl> {
        let name = self.parse_identifier()?;
        let parameters = self
            .parse_formal_parameters()
            .map_err(|e| e.with_context("constructor declaration"))?;
        let throws = if self.match_token(&Token::Throws) {
            self.parse_type_list()?
        } else {
            Vec::new()
        };
        let body = self.parse_block()?;

        Ok(ConstructorDecl {
            modifiers,
            annotations,
            type_params,
            name,
            parameters,
            throws,
            body,
            span: Span::new(start, self.previous_end()),
        })
    }

    fn parse_field_declarators(
        &mut self,
        modifiers: ModifierSet,
        annotations: Vec<Annotation>,
        type_ref: TypeRef,
        first_name: String,
        start: Location,
    ) -> ParseResult<Vec<ClassMember>> {
        let mut fields = Vec::new();
        let mut name = first_name;

        loop {
            let mut field_type = type_ref.clone();
            while self.check(&Token::LBracket) && self.check_at(1, &Token::RBracket) {
                self.current += 2;
                field_type.array_dims += 1;
            }

            let initializer = if self.match_token(&Token::Assign) {
                let stop = |p: &Parser<'_>, i: usize| match p.peek_token_type(i) {
                    Some(Token::Semicolon) => true,
                    Some(Token::Comma) => p.starts_declarator(i + 1),
                    _ => false,
                };
                Some(self.scan_raw("field initializer", stop)?)
            } else {
                None
            };

            fields.push(ClassMember::Field(FieldDecl {
                modifiers,
                annotations: annotations.clone(),
                type_ref: field_type,
                name,
                initializer,
                span: Span::new(start, self.previous_end()),
            }));

            if !self.match_token(&Token::Comma) {
                break;
            }
            name = self.parse_identifier()?;
        }

        self.consume(&Token::Semicolon, "';' after field declaration")?;
        Ok(fields)
    }

    /// `name [= ...]` followed by `,` `;` `[` or `=` starts another declarator
    fn starts_declarator(&self, i: usize) -> bool {
        self.peek_token_type(i) == Some(&Token::Identifier)
            && matches!(
                self.peek_token_type(i + 1),
                Some(Token::Assign) | Some(Token::Comma) | Some(Token::Semicolon) | Some(Token::LBracket)
            )
    }

    fn parse_formal_parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        self.consume(&Token::LParen, "'(' to open parameter list")?;

        let mut parameters = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                let start = self.current_location();
                let (modifiers, annotations) = self.parse_prefix()?;
                let mut type_ref = self.parse_type_ref()?;
                self.skip_type_annotations()?;
                let varargs = self.match_token(&Token::Ellipsis);

                // Receiver parameter: `Foo this`
                if self.match_token(&Token::This) {
                    if !self.match_token(&Token::Comma) {
                        break;
                    }
                    continue;
                }

                let name = self.parse_identifier()?;
                while self.check(&Token::LBracket) && self.check_at(1, &Token::RBracket) {
                    self.current += 2;
                    type_ref.array_dims += 1;
                }

                parameters.push(Parameter {
                    modifiers,
                    annotations,
                    type_ref,
                    name,
                    varargs,
                    span: Span::new(start, self.previous_end()),
                });

                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }

        self.consume(&Token::RParen, "')' to close parameter list")?;
        Ok(parameters)
    }

    /// Consume tokens until `stop` holds at bracket depth zero or an
    /// unbalanced closing bracket shows up. The stop token is not consumed.
    fn scan_raw<F>(&mut self, what: &str, stop: F) -> ParseResult<Fragment>
    where
        F: Fn(&Parser<'_>, usize) -> bool,
    {
        let start = self.current;
        let mut depth = 0usize;

        loop {
            match self.peek_token_type(self.current).cloned() {
                None => return Err(self.error_expected(what)),
                Some(Token::LParen) | Some(Token::LBracket) | Some(Token::LBrace) => depth += 1,
                Some(Token::RParen) | Some(Token::RBracket) | Some(Token::RBrace) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Some(_) if depth == 0 && stop(&*self, self.current) => break,
                Some(_) => {}
            }
            self.current += 1;
        }

        if self.current == start {
            return Err(self.error_expected(what));
        }
        Ok(self.fragment(start, self.current))
    }

    // Statement parsing
    fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.current_location();
        self.consume(&Token::LBrace, "'{' to open block")?;

        let mut statements = Vec::new();
        let mut iterations = 0usize;
        loop {
            iterations += 1;
            if iterations > PARSER_MAX_LOOP_ITERS {
                return Err(ParseError::invalid_syntax("block too large", start));
            }
            match self.peek_token_type(self.current).cloned() {
                None => return Err(self.error_expected("'}' to close block")),
                Some(Token::RBrace) => break,
                Some(Token::LBrace) => statements.push(Stmt::Block(self.parse_block()?)),
                Some(Token::Semicolon) => {
                    self.bump();
                    statements.push(Stmt::Empty);
                }
                Some(_) => statements.push(Stmt::Fragment(self.parse_statement_fragment()?)),
            }
        }

        self.consume(&Token::RBrace, "'}' to close block")?;
        Ok(Block {
            statements,
            span: Span::new(start, self.previous_end()),
        })
    }

    /// One statement as source text. Ends at a top-level `;` (not included)
    /// or after a braced tail such as `if (..) { .. } else { .. }`.
    fn parse_statement_fragment(&mut self) -> ParseResult<Fragment> {
        let start = self.current;
        let is_do = self.check_word(0, "do");
        let mut depth = 0usize;

        loop {
            match self.peek_token_type(self.current).cloned() {
                None => return Err(self.error_expected("';' to end statement")),
                Some(Token::LParen) | Some(Token::LBracket) | Some(Token::LBrace) => depth += 1,
                Some(Token::RParen) | Some(Token::RBracket) => depth = depth.saturating_sub(1),
                Some(Token::RBrace) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    if depth == 0 && !self.statement_continues_after(self.current + 1, is_do) {
                        self.current += 1;
                        break;
                    }
                }
                Some(Token::Semicolon) if depth == 0 => {
                    let fragment = self.fragment(start, self.current);
                    self.current += 1;
                    return Ok(fragment);
                }
                Some(_) => {}
            }
            self.current += 1;
        }

        if self.current == start {
            return Err(self.error_expected("statement"));
        }
        Ok(self.fragment(start, self.current))
    }

    fn statement_continues_after(&self, i: usize, is_do: bool) -> bool {
        match self.tokens.get(i) {
            None => false,
            Some(token) => match token.token_type() {
                Token::Identifier => {
                    matches!(token.lexeme(), "else" | "catch" | "finally") || (is_do && token.lexeme() == "while")
                }
                Token::Semicolon
                | Token::RParen
                | Token::Comma
                | Token::Dot
                | Token::Operator
                | Token::Assign
                | Token::Lt
                | Token::Gt
                | Token::Question
                | Token::Amp
                | Token::Star
                | Token::LBracket => true,
                _ => false,
            },
        }
    }
}

/// Interface members carry implicit modifiers the source leaves out
fn apply_implicit_interface_modifiers(body: &mut [ClassMember]) {
    for member in body.iter_mut() {
        match member {
            ClassMember::Method(m) => {
                if !m.is_private() {
                    m.modifiers = m.modifiers.with(Modifier::Public);
                }
                let has_code = m.modifiers.contains(Modifier::Default)
                    || m.modifiers.contains(Modifier::Static)
                    || m.is_private();
                if m.body.is_none() && !has_code {
                    m.modifiers = m.modifiers.with(Modifier::Abstract);
                }
            }
            ClassMember::Field(f) => {
                f.modifiers = f
                    .modifiers
                    .with(Modifier::Public)
                    .with(Modifier::Static)
                    .with(Modifier::Final);
            }
            _ => {}
        }
    }
}

/// Parse a Java compilation unit
pub fn parse(source: &str) -> Result<Ast> {
    Parser::new(source)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn only_class(source: &str) -> ClassDecl {
        let ast = parse(source).expect("Failed to parse");
        match ast.type_decls.into_iter().next() {
            Some(TypeDecl::Class(c)) => c,
            other => panic!("expected a class, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_package_imports_and_class() {
        let source = r#"
package com.example.service;

import java.io.IOException;
import java.util.*;
import static java.util.Objects.requireNonNull;

public class Greeter {
}
"#;
        let ast = parse(source).expect("Failed to parse");
        assert_eq!(ast.package_name(), "com.example.service");
        assert_eq!(ast.imports.len(), 3);
        assert!(ast.imports[1].is_wildcard);
        assert!(ast.imports[2].is_static);
        assert_eq!(ast.qualified_name("Greeter"), "com.example.service.Greeter");
        assert!(ast.find_class("Greeter").is_some());
    }

    #[test]
    fn test_parse_method_signature() {
        let class = only_class(
            r#"class Foo {
                public int bar(final String s, int... rest) throws IOException, java.sql.SQLException {
                    return s.length() + rest.length;
                }
            }"#,
        );
        let method = class.methods().next().expect("method");
        assert_eq!(method.name, "bar");
        assert_eq!(method.return_type.to_string(), "int");
        assert!(method.modifiers.contains(Modifier::Public));
        assert_eq!(method.parameters.len(), 2);
        assert!(method.parameters[0].modifiers.contains(Modifier::Final));
        assert!(method.parameters[1].varargs);
        let throws: Vec<String> = method.throws.iter().map(|t| t.to_string()).collect();
        assert_eq!(throws, vec!["IOException", "java.sql.SQLException"]);
        assert_eq!(method.signature(), "bar(String, int...)");
    }

    #[test]
    fn test_parse_generics() {
        let class = only_class(
            r#"public class Repo<K extends Comparable<K>, V> extends Base<K> implements Store<K, V> {
                protected <T extends Number & Comparable<T>> Map<K, List<? super T>> index(Class<T> type, List<?>[] buckets) { return null; }
            }"#,
        );
        assert_eq!(class.type_params.len(), 2);
        assert_eq!(class.type_params[0].to_string(), "K extends Comparable<K>");
        assert_eq!(class.extends.as_ref().map(|t| t.to_string()).as_deref(), Some("Base<K>"));
        assert_eq!(class.implements[0].to_string(), "Store<K, V>");

        let method = class.methods().next().expect("method");
        assert_eq!(method.type_params[0].to_string(), "T extends Number & Comparable<T>");
        assert_eq!(method.return_type.to_string(), "Map<K, List<? super T>>");
        assert_eq!(method.parameters[1].type_ref.to_string(), "List<?>[]");
    }

    #[test]
    fn test_parse_member_type_of_generic_outer() {
        let class = only_class(
            r#"class Tree {
                java.util.Map<String, Integer>.Entry<Long>.Node[] walk(Outer<String>.Inner plain) { return null; }
            }"#,
        );
        let method = class.methods().next().expect("method");
        let ret = &method.return_type;
        assert_eq!(ret.to_string(), "java.util.Map<String, Integer>.Entry<Long>.Node[]");
        assert_eq!(ret.name, "Node");
        assert_eq!(ret.erasure(), "java.util.Map.Entry.Node[]");

        let outer = ret.enclosing.as_ref().expect("enclosing");
        assert_eq!(outer.to_string(), "java.util.Map<String, Integer>.Entry<Long>");
        assert_eq!(method.parameters[0].type_ref.to_string(), "Outer<String>.Inner");
    }

    #[test]
    fn test_parse_constructors_fields_and_initializers() {
        let class = only_class(
            r#"class Account {
                static { REGISTRY.clear(); }
                private final Map<String, Integer> balances = new HashMap<String, Integer>(), history = null;
                int count, limit = 10;
                { count = 0; }
                Account(int x) { this.count = x; }
                private <T> Account(T seed, String name[]) throws Exception { this(1); }
            }"#,
        );

        let fields: Vec<&FieldDecl> = class
            .body
            .iter()
            .filter_map(|m| match m {
                ClassMember::Field(f) => Some(f),
                _ => None,
            })
            .collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].initializer.as_ref().map(|f| f.text.as_str()), Some("new HashMap<String, Integer>()"));
        assert_eq!(fields[1].name, "history");
        assert_eq!(fields[3].initializer.as_ref().map(|f| f.text.as_str()), Some("10"));

        let ctors: Vec<&ConstructorDecl> = class.constructors().collect();
        assert_eq!(ctors.len(), 2);
        assert_eq!(ctors[0].signature(), "<init>(int)");
        assert!(ctors[0].modifiers.is_empty());
        assert_eq!(ctors[1].type_params.len(), 1);
        assert_eq!(ctors[1].parameters[1].type_ref.to_string(), "String[]");
        assert_eq!(ctors[1].throws[0].to_string(), "Exception");

        let initializers = class
            .body
            .iter()
            .filter(|m| matches!(m, ClassMember::Initializer(_)))
            .count();
        assert_eq!(initializers, 2);
    }

    #[test]
    fn test_parse_body_fragments() {
        let class = only_class(
            r#"class Flow {
                void run(int x) {
                    int y = x >> 1;
                    if (y > 0) { log("pos"); } else { log("neg"); }
                    try { work(); } catch (Exception e) { fail(e); } finally { done(); }
                    do { y--; } while (y > 0);
                    Runnable r = () -> { tick(); };
                    { nested(); }
                    ;
                }
            }"#,
        );
        let body = class.methods().next().and_then(|m| m.body.as_ref()).expect("body");
        let texts: Vec<String> = body
            .statements
            .iter()
            .map(|s| match s {
                Stmt::Fragment(f) => f.text.clone(),
                Stmt::Block(_) => "{block}".to_string(),
                Stmt::Empty => ";".to_string(),
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                "int y = x >> 1",
                r#"if (y > 0) { log("pos"); } else { log("neg"); }"#,
                "try { work(); } catch (Exception e) { fail(e); } finally { done(); }",
                "do { y--; } while (y > 0)",
                "Runnable r = () -> { tick(); }",
                "{block}",
                ";",
            ]
        );
    }

    #[test]
    fn test_parse_annotations() {
        let class = only_class(
            r#"@Deprecated
            public abstract class Mocked {
                @MockMethod(targetMethod = "get", targetClass = Map.class)
                @SuppressWarnings({"unchecked", "rawtypes"})
                protected abstract Object fetch(@Nullable String key);
            }"#,
        );
        assert_eq!(class.annotations[0].name, "Deprecated");
        assert!(class.modifiers.contains(Modifier::Abstract));

        let method = class.methods().next().expect("method");
        assert!(method.is_abstract());
        assert!(method.body.is_none());
        assert_eq!(method.annotations[0].argument("targetMethod"), Some("\"get\""));
        assert_eq!(method.annotations[0].argument("targetClass"), Some("Map.class"));
        assert_eq!(method.annotations[1].argument("value"), Some(r#"{"unchecked", "rawtypes"}"#));
        assert_eq!(method.parameters[0].annotations[0].name, "Nullable");
    }

    #[test]
    fn test_parse_interface_implicit_modifiers() {
        let ast = parse(
            r#"interface Shape {
                double PI = 3.14;
                double area();
                default String label() { return "shape"; }
                static Shape unit() { return null; }
            }"#,
        )
        .expect("parse");
        let TypeDecl::Interface(shape) = &ast.type_decls[0] else {
            panic!("expected interface");
        };
        let methods: Vec<&MethodDecl> = shape
            .body
            .iter()
            .filter_map(|m| match m {
                ClassMember::Method(m) => Some(m),
                _ => None,
            })
            .collect();
        assert!(methods[0].is_abstract());
        assert!(methods[0].modifiers.contains(Modifier::Public));
        assert!(!methods[1].is_abstract());
        assert!(!methods[2].is_abstract());
    }

    #[test]
    fn test_parse_nested_and_opaque_types() {
        let class = only_class(
            r#"class Outer {
                enum Mode { A, B; void m() {} }
                @interface Marker { int value() default 1; }
                record Point(int x, int y) implements Comparable<Point> { }
                static class Inner { void inner() {} }
                void outer() {}
            }"#,
        );
        let nested: Vec<String> = class
            .body
            .iter()
            .filter_map(|m| match m {
                ClassMember::TypeDecl(t) => Some(t.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(nested, vec!["enum Mode", "@interface Marker", "record Point", "class Inner"]);
        assert_eq!(class.methods().count(), 1);
    }

    #[test]
    fn test_parse_error_has_position() {
        let err = parse("class Broken {\n  int bar( {\n}").unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_unterminated_class_fails() {
        assert!(parse("class Open { void m() {}").is_err());
    }
}
