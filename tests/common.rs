// Common test utilities
#![allow(dead_code)]

use std::cell::RefCell;
use testable_gen::ast::ClassDecl;
use testable_gen::codegen::{Member, Statement, StatementArg, StatementProvider};
use testable_gen::parser::parse_class;

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse `source` and return its top-level class `name`
pub fn class(source: &str, name: &str) -> ClassDecl {
    init_logging();
    parse_class(source, name).expect("Failed to parse").1
}

/// Provider that records every call and answers with `mark("<class>#<signature>", n)`
/// statements, `per_member` of them per member
#[derive(Default)]
pub struct Recorder {
    pub per_member: usize,
    pub calls: RefCell<Vec<(String, String)>>,
}

impl Recorder {
    pub fn new(per_member: usize) -> Self {
        Self {
            per_member,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl StatementProvider for Recorder {
    fn provide(&self, class_name: &str, member: &Member<'_>) -> Vec<Statement> {
        self.calls.borrow_mut().push((class_name.to_string(), member.signature()));
        (0..self.per_member)
            .map(|n| {
                Statement::new(
                    "mark($S, $L)",
                    vec![
                        StatementArg::Str(format!("{}#{}", class_name, member.signature())),
                        StatementArg::Literal(n.to_string()),
                    ],
                )
            })
            .collect()
    }
}
