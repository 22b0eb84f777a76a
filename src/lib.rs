//! testable-gen
//!
//! Synthesizes test-time stand-ins for Java classes: for every class it builds
//! a `public final` subclass whose methods and constructors are rewritten as
//! public members with bodies supplied by a pluggable statement provider.
//!
//! ## Architecture
//!
//! - **parser**: Lexical analysis and parsing of Java source into AST
//! - **ast**: Declaration-level syntax tree and its visitor
//! - **codegen**: Member collection, rewriting, class assembly and Java emission
//! - **mock**: `@MockMethod` metadata and mock scopes
//! - **driver**: Files in, generated sources out
//! - **bin**: Command-line interface
//!
//! ## Generation Flow
//!
//! ```text
//! Java Source → Parser → AST → MethodCollector → ClassSynthesizer → JavaWriter → .java
//!                                                      ↑
//!                                              StatementProvider
//! ```

pub mod ast;
pub mod codegen;
pub mod config;
pub mod consts;
pub mod driver;
pub mod error;
pub mod mock;
pub mod parser;

pub use codegen::{ClassSynthesizer, Member, Statement, StatementArg, StatementProvider, SyntheticClass};
pub use config::Config;
pub use error::{Error, Result};

/// Parse `source`, synthesize `package.class_name` from its class
/// `original`, and render it as Java source
pub fn generate(source: &str, original: &str, package: &str, class_name: &str, config: &Config) -> Result<String> {
    let ast = parser::parse_java(source)?;
    let class = ast
        .find_class(original)
        .ok_or_else(|| Error::ClassNotFound(ast.qualified_name(original)))?;

    log::debug!("generating {} from {}", class_name, ast.qualified_name(original));
    let synthetic = ClassSynthesizer::with_defaults(config.clone()).synthesize(class, package, class_name)?;
    codegen::render(&synthetic, config)
}
