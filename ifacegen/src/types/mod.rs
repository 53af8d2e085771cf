//! Mapping of native types and names to the target language.

pub(crate) mod conversion;
pub(crate) mod naming;
pub(crate) mod primitive;
