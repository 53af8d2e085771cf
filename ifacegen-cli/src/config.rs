//! Batch file listing the classes to extract in one run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Compiler queried for its system include directories
    #[serde(default = "default_compiler")]
    pub compiler: String,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    /// Extra include directories treated like system ones
    #[serde(default)]
    pub include: Vec<PathBuf>,
    /// Extra compiler arguments, e.g. `-DNDEBUG`
    #[serde(default)]
    pub args: Vec<String>,
    pub output_dir: PathBuf,
    #[serde(rename = "class", default)]
    pub classes: Vec<ClassEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassEntry {
    /// Header declaring the class
    pub header: PathBuf,
    /// Native class name
    pub name: String,
    /// Target namespace of the generated bindings
    pub namespace: String,
}

fn default_compiler() -> String {
    ifacegen::DEFAULT_COMPILER.to_string()
}

fn default_recursive() -> bool {
    true
}

impl BatchConfig {
    /// Read a batch file. Relative paths in it are taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut config: BatchConfig =
            toml::from_str(&text).with_context(|| format!("parsing TOML at {}", path.display()))?;
        if config.classes.is_empty() {
            bail!("no [[class]] entries in {}", path.display());
        }
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.output_dir = base.join(&config.output_dir);
        for include in &mut config.include {
            *include = base.join(&*include);
        }
        for class in &mut config.classes {
            class.header = base.join(&class.header);
        }
        Ok(config)
    }

    /// Class entries grouped by header, headers in order of first appearance.
    pub fn classes_by_header(&self) -> Vec<(&Path, Vec<&ClassEntry>)> {
        let mut groups: Vec<(&Path, Vec<&ClassEntry>)> = Vec::new();
        for class in &self.classes {
            match groups.iter_mut().find(|(header, _)| *header == class.header) {
                Some((_, classes)) => classes.push(class),
                None => groups.push((&class.header, vec![class])),
            }
        }
        groups
    }
}
