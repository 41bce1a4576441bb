//! Procedural macros for ODB.
//!
//! `#[derive(Record)]` implements `odb_core::Record` for a struct with named
//! fields and an `id: Option<i64>` primary key.
//!
//! Generated code names its dependencies through the `odb` facade, so a
//! crate that depends on `odb` alone can use the derive.
//!
//! ```ignore
//! #[derive(Debug, Default, Record)]
//! #[record(table = "users")]
//! #[record(relation(name = "profile", target = Profile, column = "username", property = "username"))]
//! #[record(relation(name = "friends", kind = "to_many", target = User))]
//! struct User {
//!     id: Option<i64>,
//!     username: Option<String>,
//!     #[record(skip)]
//!     session_cache: Vec<u8>,
//! }
//! ```
//!
//! Every relation also gets an accessor, e.g. `user.profile(&engine)?`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record_derive;

#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match record_derive::parse_record(&input) {
        Ok(def) => record_derive::generate_record_impl(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
