//! Assembly of the synthetic subclass

use super::member::{eligible_members, Member};
use super::method::{build_constructor, build_member_method, MethodSpec};
use super::statement::{CallSuperStatements, StatementProvider};
use crate::ast::{ClassDecl, Modifier, ModifierSet, TypeParam, TypeRef};
use crate::config::Config;
use crate::consts::CONSTRUCTOR_NAME;
use crate::error::{Error, Result};

/// Generated `public final` subclass of an original class
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticClass {
    pub package: String,
    pub name: String,
    pub modifiers: ModifierSet,
    pub type_params: Vec<TypeParam>,
    pub superclass: TypeRef,
    pub members: Vec<MethodSpec>,
}

impl SyntheticClass {
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodSpec> {
        self.members.iter().filter(|m| m.is_constructor())
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodSpec> {
        self.members.iter().filter(|m| !m.is_constructor())
    }
}

/// Builds synthetic classes, asking `provider` for every member body
pub struct ClassSynthesizer<P> {
    config: Config,
    provider: P,
}

impl ClassSynthesizer<CallSuperStatements> {
    /// Synthesizer whose members forward to the superclass
    pub fn with_defaults(config: Config) -> Self {
        Self::new(config, CallSuperStatements)
    }
}

impl<P: StatementProvider> ClassSynthesizer<P> {
    pub fn new(config: Config, provider: P) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Build `package.class_name`, a subclass of `class` with every eligible
    /// member rewritten. Fails without output if any member breaks the
    /// declaration contract.
    pub fn synthesize(&self, class: &ClassDecl, package: &str, class_name: &str) -> Result<SyntheticClass> {
        let members = eligible_members(class);
        for member in &members {
            check_member(class, member)?;
        }

        let mut specs = Vec::with_capacity(members.len());
        for member in &members {
            let statements = self.provider.provide_in(class, class_name, member);
            if self.config.debug {
                log::debug!("{}: {} statement(s) for {}", class_name, statements.len(), member.signature());
            }

            let spec = match member {
                Member::Constructor(ctor) => build_constructor(ctor, statements),
                Member::Method(method) => build_member_method(method, &self.config.permissive_exception, statements),
            };
            specs.push(spec);
        }

        log::debug!(
            "synthesized {} from {} with {} member(s)",
            class_name,
            class.name,
            specs.len()
        );

        Ok(SyntheticClass {
            package: package.to_string(),
            name: class_name.to_string(),
            modifiers: ModifierSet::of(&[Modifier::Public, Modifier::Final]),
            type_params: class.type_params.clone(),
            superclass: class.as_type_ref(),
            members: specs,
        })
    }
}

fn check_member(class: &ClassDecl, member: &Member<'_>) -> Result<()> {
    match member {
        Member::Constructor(ctor) if ctor.name != class.name => Err(Error::malformed(
            format!("{}.{}", class.name, ctor.name),
            "constructor name does not match its class; a method needs a return type",
        )),
        Member::Method(method) if method.name == CONSTRUCTOR_NAME => Err(Error::malformed(
            format!("{}.{}", class.name, method.signature()),
            "reserved constructor name used for a method",
        )),
        _ => Ok(()),
    }
}
