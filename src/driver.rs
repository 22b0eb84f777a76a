//! Source-to-source driver: parse Java files, synthesize, write results

use crate::codegen::{ClassSynthesizer, JavaWriter, StatementProvider, SyntheticClass};
use crate::config::Config;
use crate::error::Result;
use crate::parser::parse_java;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One generated compilation unit
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUnit {
    pub class: SyntheticClass,
    pub source: String,
}

impl GeneratedUnit {
    /// Path of the unit relative to an output root, `a/b/NameTestable.java`
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.class.package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.java", self.class.name));
        path
    }
}

/// Synthesize every top-level class in `source` with the default provider
pub fn generate_source(source: &str, config: &Config) -> Result<Vec<GeneratedUnit>> {
    let synthesizer = ClassSynthesizer::with_defaults(config.clone());
    generate_with(&synthesizer, source)
}

/// Synthesize every top-level class in `source` as `<Name><suffix>` in the
/// same package, rendering each with the synthesizer's configuration
pub fn generate_with<P: StatementProvider>(synthesizer: &ClassSynthesizer<P>, source: &str) -> Result<Vec<GeneratedUnit>> {
    let config = synthesizer.config();
    let ast = parse_java(source)?;
    let package = ast.package_name();

    let mut units = Vec::new();
    for class in ast.classes() {
        let name = format!("{}{}", class.name, config.class_suffix);
        let synthetic = synthesizer.synthesize(class, package, &name)?;
        let source = JavaWriter::new(config).write(&synthetic)?;
        units.push(GeneratedUnit {
            class: synthetic,
            source,
        });
    }
    Ok(units)
}

/// Generate units for every `.java` file under `input` (a file or a
/// directory) and write them below `output`. Returns the written paths.
pub fn generate_tree(input: &Path, output: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "java") {
            continue;
        }

        log::debug!("generating from {}", path.display());
        let source = fs::read_to_string(path)?;
        for unit in generate_source(&source, config)? {
            let target = output.join(unit.relative_path());
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &unit.source)?;
            log::info!("wrote {}", target.display());
            written.push(target);
        }
    }

    Ok(written)
}
