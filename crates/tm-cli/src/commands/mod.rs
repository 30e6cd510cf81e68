//! CLI command implementations

pub(crate) mod clean;
pub(crate) mod common;
pub(crate) mod generate;
pub(crate) mod history;
pub(crate) mod migrate;
pub(crate) mod purge;
pub(crate) mod status;

#[cfg(test)]
pub(crate) mod test_support;
