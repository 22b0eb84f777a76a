//! Code generation module
//!
//! Turns a parsed class declaration into a synthetic `public final` subclass
//! (`class`), built member by member (`member`, `method`) with bodies from a
//! [`StatementProvider`], and renders it as Java source (`writer`).

pub mod class;
pub mod collector;
pub mod member;
pub mod method;
pub mod statement;
pub mod writer;

// Re-export commonly used types
pub use class::{ClassSynthesizer, SyntheticClass};
pub use collector::MethodCollector;
pub use member::{eligible_members, is_eligible, Member};
pub use method::{build_constructor, build_member_method, to_public_flags, MethodKind, MethodSpec};
pub use statement::{provider_fn, CallSuperStatements, Statement, StatementArg, StatementProvider};
pub use writer::{expand_template, render, JavaWriter};

use crate::ast::ClassDecl;
use crate::config::Config;
use crate::error::Result;

/// Synthesize `package.class_name` from `class` with default settings,
/// forwarding every member to the superclass
pub fn synthesize(class: &ClassDecl, package: &str, class_name: &str) -> Result<SyntheticClass> {
    ClassSynthesizer::with_defaults(Config::default()).synthesize(class, package, class_name)
}
