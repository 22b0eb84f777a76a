//! Abstract Syntax Tree (AST) representation of a Java compilation unit
//!
//! The tree only goes as deep as class synthesis needs: declarations are fully
//! structured, method bodies are kept as blocks of raw source fragments.

mod nodes;
mod visitor;

pub use nodes::*;
pub use visitor::*;

use std::fmt;

/// Source location information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

/// Span of source code (start and end locations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Span for nodes built in code rather than parsed
    pub fn synthetic() -> Self {
        Self::default()
    }
}

/// AST node trait that all AST nodes implement
pub trait AstNode {
    /// Get the source span of this node
    fn span(&self) -> Span;

    /// Accept a visitor
    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V);
}

/// Main AST root node
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub package_decl: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub type_decls: Vec<TypeDecl>,
    pub span: Span,
}

impl Ast {
    /// Package name, empty for the default package
    pub fn package_name(&self) -> &str {
        self.package_decl.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    /// Top-level classes in declaration order
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.type_decls.iter().filter_map(|t| match t {
            TypeDecl::Class(c) => Some(c),
            _ => None,
        })
    }

    /// Look up a top-level class by simple name
    pub fn find_class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes().find(|c| c.name == name)
    }

    /// Fully-qualified name of a top-level type declared in this unit
    pub fn qualified_name(&self, simple_name: &str) -> String {
        match self.package_name() {
            "" => simple_name.to_string(),
            package => format!("{}.{}", package, simple_name),
        }
    }
}

impl AstNode for Ast {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<'ast, V: AstVisitor<'ast>>(&'ast self, visitor: &mut V) {
        visitor.visit_ast(self)
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref package) = self.package_decl {
            writeln!(f, "{}", package)?;
        }

        for import in &self.imports {
            writeln!(f, "{}", import)?;
        }

        for type_decl in &self.type_decls {
            writeln!(f, "{}", type_decl)?;
        }

        Ok(())
    }
}
