//! Frontend serving pre-built translation units, for tests and replaying snapshots.

use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    frontend::{Frontend, TranslationUnit},
};

/// A [`Frontend`] that hands out clones of registered translation units.
///
/// Every call to [`parse`](Frontend::parse) is recorded together with its arguments, so
/// callers can check which files were parsed and how often.
#[derive(Debug, Default)]
pub struct MemoryFrontend {
    units: HashMap<PathBuf, TranslationUnit>,
    parsed: RefCell<Vec<(PathBuf, Vec<String>)>>,
}

impl MemoryFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a translation unit under its own path.
    pub fn with_unit(mut self, unit: TranslationUnit) -> Self {
        self.units.insert(unit.path.clone(), unit);
        self
    }

    /// Paths passed to `parse`, in call order.
    pub fn parsed_paths(&self) -> Vec<PathBuf> {
        self.parsed.borrow().iter().map(|(p, _)| p.clone()).collect()
    }

    /// Arguments passed with the most recent `parse` call.
    pub fn last_args(&self) -> Option<Vec<String>> {
        self.parsed.borrow().last().map(|(_, args)| args.clone())
    }
}

impl Frontend for MemoryFrontend {
    fn parse(&self, path: &Path, args: &[String]) -> Result<TranslationUnit> {
        self.parsed
            .borrow_mut()
            .push((path.to_path_buf(), args.to_vec()));
        self.units.get(path).cloned().ok_or_else(|| Error::Frontend {
            path: path.to_path_buf(),
            message: "no such translation unit".to_string(),
        })
    }
}
