// rusty-validator procedural macros

use proc_macro::TokenStream;

use syn::{parse_macro_input, DeriveInput};

mod validation;

/// Derive macro exposing a struct's fields to the validator
///
/// Generates `rusty_validator::Validate` (static field descriptors plus a
/// field accessor) and `rusty_validator::ToValue` so the struct can be
/// validated directly and nested inside other records.
///
/// # Example
///
/// ```ignore
/// use rusty_validator::Validate;
///
/// #[derive(Validate)]
/// struct CreateUserRequest {
///     #[tag(validate = "min?3,max?40", json = "user_name")]
///     username: String,
///
///     #[tag(validate = "nonzero&err=is required")]
///     name: String,
///
///     #[tag(validate = "min?21")]
///     age: u32,
///
///     // Nested records are validated even without a tag
///     address: Option<Address>,
///
///     #[tag(skip)]
///     cache: SomethingNotValidatable,
/// }
/// ```
///
/// # Field Attributes
///
/// - `#[tag(key = "value", ...)]` - annotations read by the validator. The
///   validator reads rules from the `validate` key and alternate names from
///   the `json` key by default; both keys are configurable at runtime.
/// - `#[tag(skip)]` - leave the field out entirely
///
/// Tuple struct fields are named `"0"`, `"1"`, ...
#[proc_macro_derive(Validate, attributes(tag))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    validation::impl_validate(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
