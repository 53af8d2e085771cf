pub(crate) mod collector;
pub(crate) mod diagnostics;
pub(crate) mod extract;
pub(crate) mod record;
pub(crate) mod schema;
pub(crate) mod validate;
