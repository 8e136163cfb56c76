#![allow(unused_crate_dependencies)]

mod query_errors;
mod wire_rules;
