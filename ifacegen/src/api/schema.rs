//! Plain nested-data form of a class interface, as consumed by the binding templates.

use std::{fs, path::Path};

use crate::{
    api::record::ClassInterface,
    error::{Error, Result},
};

/// Nested string/list/map data with keys in record order
pub type Schema = serde_json::Value;

/// Structural copy of `class_interface` as nested data.
///
/// Nothing is validated here, sentinels from collection are copied as they are.
pub fn to_dict(class_interface: &ClassInterface) -> Result<Schema> {
    Ok(serde_json::to_value(class_interface)?)
}

/// Write the schema of `class_interface` to `path` as pretty-printed JSON.
pub fn write_schema(path: &Path, class_interface: &ClassInterface) -> Result<()> {
    let mut content = serde_json::to_string_pretty(&to_dict(class_interface)?)?;
    content.push('\n');
    fs::write(path, content).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "Wrote {} ({} methods) to {}",
        class_interface.class_type.target_name,
        class_interface.class_type.methods.len(),
        path.display()
    );
    Ok(())
}

/// Load a schema file written by [`write_schema`].
pub fn read_schema(path: &Path) -> Result<ClassInterface> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
