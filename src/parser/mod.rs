//! Parser module for Java declarations
//!
//! This module handles lexical analysis and parsing of .java files into AST.

pub mod lexer;
pub mod parser;
pub mod error;

pub use lexer::Lexer;
pub use parser::Parser;
pub use error::{ParseError, ParseResult};

use crate::ast::{Ast, ClassDecl, TypeDecl};
use crate::error::{Error, Result};

/// Parse a .java source file into an AST
pub fn parse_java(source: &str) -> Result<Ast> {
    parser::parse(source)
}

/// Parse multiple .java source files
pub fn parse_java_files(sources: &[&str]) -> Result<Vec<Ast>> {
    let mut asts = Vec::new();
    for source in sources {
        asts.push(parse_java(source)?);
    }
    Ok(asts)
}

/// Parse a unit and take ownership of one top-level class in it
pub fn parse_class(source: &str, name: &str) -> Result<(String, ClassDecl)> {
    let ast = parse_java(source)?;
    let package = ast.package_name().to_string();
    ast.type_decls
        .into_iter()
        .find_map(|t| match t {
            TypeDecl::Class(c) if c.name == name => Some(c),
            _ => None,
        })
        .map(|c| (package, c))
        .ok_or_else(|| Error::ClassNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_class() {
        let source = r#"
package com.example;

public class HelloWorld {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#;

        let ast = parse_java(source).expect("Failed to parse");
        assert_eq!(ast.type_decls.len(), 1);
        assert_eq!(ast.to_string(), "package com.example;\nclass HelloWorld\n");
    }

    #[test]
    fn test_parse_with_imports() {
        let source = r#"
package com.example;

import java.util.List;
import java.util.ArrayList;

public class TestClass {
    private List<String> items = new ArrayList<>();
}
"#;

        let ast = parse_java(source).expect("Failed to parse");
        assert_eq!(ast.imports.len(), 2);
    }

    #[test]
    fn test_parse_class_by_name() {
        let (package, class) = parse_class("package p; class A {} class B { void m() {} }", "B").expect("class B");
        assert_eq!(package, "p");
        assert_eq!(class.methods().count(), 1);

        match parse_class("class A {}", "Missing") {
            Err(Error::ClassNotFound(name)) => assert_eq!(name, "Missing"),
            other => panic!("unexpected result: {:?}", other.map(|(_, c)| c.name)),
        }
    }

    #[test]
    fn test_parse_many() {
        let asts = parse_java_files(&["class A {}", "interface B {}"]).expect("parse");
        assert_eq!(asts.len(), 2);
        assert!(parse_java_files(&["class A {}", "class {"]).is_err());
    }
}
