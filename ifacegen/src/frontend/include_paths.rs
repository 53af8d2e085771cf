//! Discovery of the system include search list of a native C++ compiler.
//!
//! libclang does not know where the standard library headers live unless it is told, and
//! silently resolves types it cannot see (such as `std::string`) to `int`. The search list is
//! taken from the compiler's verbose preprocessing output.

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use crate::error::{Error, Result};

const SEARCH_LIST_START: &str = "#include <...> search starts here:";
const SEARCH_LIST_END: &str = "End of search list.";

/// Compiler used for discovery when none is configured
pub const DEFAULT_COMPILER: &str = "clang";

/// Run `<compiler> -v -E -x c++ -` on empty input and return its system include directories.
pub fn discover_system_include_paths(compiler: &str) -> Result<Vec<PathBuf>> {
    let output = Command::new(compiler)
        .args(["-v", "-E", "-x", "c++", "-"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| Error::IncludeDiscovery {
            compiler: compiler.to_string(),
            source,
        })?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    let paths = parse_include_search_list(&stderr);
    if paths.is_empty() {
        log::warn!("`{compiler}` reported no system include directories");
    }
    Ok(paths)
}

/// Extract the directories listed between the search list markers.
///
/// Only the last `#include <...>` list counts; without it the result is empty.
pub fn parse_include_search_list(output: &str) -> Vec<PathBuf> {
    let Some((_, after_start)) = output.rsplit_once(SEARCH_LIST_START) else {
        return Vec::new();
    };
    let list = after_start
        .split_once(SEARCH_LIST_END)
        .map_or(after_start, |(list, _)| list);
    list.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
