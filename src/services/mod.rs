//! Service layer containing the fixture checks and their helpers.
//!
//! ## Service map
//! - `lookup.rs`: sample lookup, path templates, dotted paths, `$ref` resolution.
//! - `datetime.rs`: timestamp format validation (strict or RFC 3339).
//! - `schema.rs`: JSON Schema validation of fragments via `jsonschema`.
//! - `findings.rs`: check context, violation collection, JSON path locations.
//! - `contract_checks.rs`: deprecated endpoint, auth, path versioning, consistency.
//! - `schema_checks.rs`: response schema, field relocation, schema evolution.
//! - `suite.rs`: check registry and runner.
//! - `config.rs`: TOML config loading.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - Checks are pure functions over a borrowed fixture.
//! - A check reports every violation it can find; it never stops the suite.
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod contract_checks;
pub mod datetime;
pub mod findings;
pub mod lookup;
pub mod output;
pub mod schema;
pub mod schema_checks;
pub mod suite;

#[cfg(test)]
pub mod test_support;
