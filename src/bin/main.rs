use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use testable_gen::codegen::MethodCollector;
use testable_gen::config::Config;
use testable_gen::driver::generate_tree;
use testable_gen::parser::parse_java;

#[derive(Parser)]
#[command(name = "testable-gen")]
#[command(about = "Generate testable subclasses from Java sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a testable subclass for every class in a file or directory
    Generate {
        /// Input .java file or source directory
        #[arg(value_name = "PATH")]
        input: PathBuf,

        /// Output directory for generated sources
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the members of each class that would be rewritten
    Members {
        /// Input .java file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Lexically analyze a .java file
    Lex {
        /// Input .java file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show token locations
        #[arg(short, long)]
        locations: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { input, output, verbose } => {
            generate(input, output.as_deref(), *verbose)?;
        }
        Commands::Members { input } => {
            list_members(input)?;
        }
        Commands::Lex { input, locations } => {
            lex_file(input, *locations)?;
        }
    }

    Ok(())
}

fn generate(input: &Path, output: Option<&Path>, verbose: bool) -> Result<()> {
    let config = Config::from_env()?;
    let output_dir = output.unwrap_or_else(|| Path::new("."));

    let written = generate_tree(input, output_dir, &config)
        .with_context(|| format!("failed to generate from {}", input.display()))?;

    if verbose {
        for path in &written {
            println!("{}", path.display());
        }
    }
    println!("Generated {} class(es) into {}", written.len(), output_dir.display());

    Ok(())
}

fn list_members(input: &Path) -> Result<()> {
    let source = fs::read_to_string(input).with_context(|| format!("cannot read {}", input.display()))?;
    let ast = parse_java(&source)?;

    for class in ast.classes() {
        println!("{}", ast.qualified_name(&class.name));
        for member in MethodCollector::collect(class) {
            let marker = if member.is_abstract() { " (abstract, skipped)" } else { "" };
            println!("  {} {}{}", member.modifiers(), member.signature(), marker);
        }
    }

    Ok(())
}

fn lex_file(input: &Path, locations: bool) -> Result<()> {
    let source = fs::read_to_string(input)?;
    let lexer = testable_gen::parser::Lexer::new(&source);
    let tokens = lexer.tokenize().map_err(|e| anyhow::anyhow!("Lexical error: {}", e))?;

    for token in tokens {
        if locations {
            println!("{:?} at {}:{}", token.token_type(), token.location().line, token.location().column);
        } else {
            println!("{:?}: '{}'", token.token_type(), token.lexeme());
        }
    }

    Ok(())
}
