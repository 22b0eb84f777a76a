//! Java source emission for synthetic classes

use super::class::SyntheticClass;
use super::method::MethodSpec;
use super::statement::{Statement, StatementArg};
use crate::ast::TypeParam;
use crate::config::Config;
use crate::consts::OVERRIDE_ANNOTATION;
use crate::error::{Error, Result};

/// Renders a [`SyntheticClass`] as a Java compilation unit
pub struct JavaWriter<'c> {
    config: &'c Config,
    indent_level: usize,
    output: String,
}

impl<'c> JavaWriter<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            indent_level: 0,
            output: String::new(),
        }
    }

    pub fn write(&mut self, class: &SyntheticClass) -> Result<String> {
        self.output.clear();
        self.indent_level = 0;

        if !class.package.is_empty() {
            self.writeln(&format!("package {};", class.package));
            self.output.push('\n');
        }

        self.writeln(&format!(
            "{} class {}{} extends {} {{",
            class.modifiers,
            class.name,
            type_params(&class.type_params),
            class.superclass
        ));

        self.indent();
        for (i, member) in class.members.iter().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            self.write_member(&class.name, member)?;
        }
        self.dedent();

        self.writeln("}");
        Ok(std::mem::take(&mut self.output))
    }

    fn write_member(&mut self, class_name: &str, member: &MethodSpec) -> Result<()> {
        if member.is_override {
            self.writeln(&format!("@{}", OVERRIDE_ANNOTATION));
        }

        let mut header = member.modifiers.to_string();
        if !member.type_params.is_empty() {
            header.push(' ');
            header.push_str(&type_params(&member.type_params));
        }
        header.push(' ');
        match member.return_type() {
            Some(return_type) => {
                header.push_str(&return_type.to_string());
                header.push(' ');
                header.push_str(member.name());
            }
            None => header.push_str(class_name),
        }

        let params: Vec<String> = member.parameters.iter().map(|p| p.to_string()).collect();
        header.push('(');
        header.push_str(&params.join(", "));
        header.push(')');

        if !member.exceptions.is_empty() {
            let exceptions: Vec<String> = member.exceptions.iter().map(|e| e.to_string()).collect();
            header.push_str(" throws ");
            header.push_str(&exceptions.join(", "));
        }
        header.push_str(" {");
        self.writeln(&header);

        self.indent();
        for statement in &member.statements {
            let code = expand_statement(statement)?;
            for line in code.lines() {
                self.writeln(line);
            }
        }
        self.dedent();

        self.writeln("}");
        Ok(())
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn writeln(&mut self, s: &str) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.config.indent);
        }
        self.output.push_str(s);
        self.output.push('\n');
    }
}

/// Render `class` with `config`'s formatting
pub fn render(class: &SyntheticClass, config: &Config) -> Result<String> {
    JavaWriter::new(config).write(class)
}

fn type_params(params: &[TypeParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
    format!("<{}>", params.join(", "))
}

/// Expand a statement and terminate it with `;`
pub fn expand_statement(statement: &Statement) -> Result<String> {
    let mut code = expand_template(&statement.template, &statement.args)?;
    code.push(';');
    Ok(code)
}

/// Substitute `$L`, `$N`, `$S` and `$T` with `args` in order; `$$` is a dollar sign.
///
/// `$L` takes any argument verbatim, the others only their own kind. Every
/// argument has to be consumed.
pub fn expand_template(template: &str, args: &[StatementArg]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let kind = match chars.next() {
            Some('$') => {
                out.push('$');
                continue;
            }
            Some(kind @ ('L' | 'N' | 'S' | 'T')) => kind,
            Some(other) => {
                return Err(Error::template_error(template, format!("unknown placeholder ${}", other)));
            }
            None => return Err(Error::template_error(template, "dangling '$' at end of template")),
        };

        let arg = args.get(next_arg).ok_or_else(|| {
            Error::template_error(template, format!("no argument for placeholder #{} (${})", next_arg + 1, kind))
        })?;
        next_arg += 1;

        match (kind, arg) {
            ('L', arg) => out.push_str(arg.text()),
            ('N', StatementArg::Name(name)) | ('T', StatementArg::Type(name)) => out.push_str(name),
            ('S', StatementArg::Str(s)) => out.push_str(&string_literal(s)),
            (kind, arg) => {
                return Err(Error::template_error(
                    template,
                    format!("${} given a ${} argument '{}'", kind, arg.placeholder(), arg.text()),
                ));
            }
        }
    }

    if next_arg != args.len() {
        return Err(Error::template_error(
            template,
            format!("{} argument(s) given, {} used", args.len(), next_arg),
        ));
    }

    Ok(out)
}

fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> StatementArg {
        StatementArg::Literal(s.to_string())
    }

    #[test]
    fn test_expand_all_placeholders() {
        let code = expand_template(
            "$T m = find($S, $N, $L) // $$",
            &[
                StatementArg::Type("java.lang.reflect.Method".into()),
                StatementArg::Str("say \"hi\"\n".into()),
                StatementArg::Name("target".into()),
                lit("1 + 2"),
            ],
        )
        .expect("expand");
        assert_eq!(code, r#"java.lang.reflect.Method m = find("say \"hi\"\n", target, 1 + 2) // $"#);
    }

    #[test]
    fn test_literal_accepts_any_kind() {
        let code = expand_template("$L.$L", &[StatementArg::Name("a".into()), StatementArg::Str("b".into())]).expect("expand");
        assert_eq!(code, "a.b");
    }

    #[test]
    fn test_expand_errors() {
        assert!(matches!(expand_template("$N", &[lit("x")]), Err(Error::Template { .. })));
        assert!(matches!(expand_template("$L $L", &[lit("x")]), Err(Error::Template { .. })));
        assert!(matches!(expand_template("done", &[lit("x")]), Err(Error::Template { .. })));
        assert!(matches!(expand_template("$X", &[]), Err(Error::Template { .. })));
        assert!(matches!(expand_template("cost $", &[]), Err(Error::Template { .. })));
    }

    #[test]
    fn test_statement_gets_semicolon() {
        let statement = Statement::new("super($L)", vec![lit("x")]);
        assert_eq!(expand_statement(&statement).expect("expand"), "super(x);");
    }
}
