// File: rusty-validator-derive/src/validation.rs
// Purpose: `#[tag(...)]` attribute extraction and Validate code generation

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, GenericParam, LitStr, Member, Token};

/// Annotations collected from the `#[tag]` attributes of one field
#[derive(Debug, Default)]
pub struct FieldTags {
    pub tags: Vec<(String, String)>,
    pub skip: bool,
}

/// Parse `#[tag(key = "value", skip)]` attributes from a field
pub fn extract_field_tags(attrs: &[syn::Attribute]) -> syn::Result<FieldTags> {
    let mut field_tags = FieldTags::default();

    for attr in attrs {
        if !attr.path().is_ident("tag") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let key = match meta.path.get_ident() {
                Some(ident) => ident.unraw().to_string(),
                None => return Err(meta.error("expected a tag key")),
            };

            if meta.input.peek(Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                if field_tags.tags.iter().any(|(existing, _)| *existing == key) {
                    return Err(meta.error(format!("duplicate tag `{}`", key)));
                }
                field_tags.tags.push((key, value.value()));
                Ok(())
            } else if key == "skip" {
                field_tags.skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `key = \"value\"` or `skip`"))
            }
        })?;
    }

    Ok(field_tags)
}

/// Generate `Validate` and `ToValue` implementations for a struct
pub fn impl_validate(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Validate only supports structs",
            ))
        }
    };

    let mut descriptors = Vec::new();
    let mut accessors = Vec::new();

    let members: Vec<(Member, String, &syn::Field)> = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|field| {
                let ident = field.ident.as_ref()?;
                Some((
                    Member::Named(ident.clone()),
                    ident.unraw().to_string(),
                    field,
                ))
            })
            .collect(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(index, field)| (Member::Unnamed(index.into()), index.to_string(), field))
            .collect(),
        Fields::Unit => Vec::new(),
    };

    for (member, field_name, field) in members {
        let field_tags = extract_field_tags(&field.attrs)?;
        if field_tags.skip {
            continue;
        }

        let index = descriptors.len();
        let tag_pairs = field_tags
            .tags
            .iter()
            .map(|(key, value)| quote! { (#key, #value) });

        descriptors.push(quote! {
            ::rusty_validator::FieldDescriptor::new(#field_name, &[#(#tag_pairs),*])
        });
        accessors.push(quote! {
            #index => ::rusty_validator::ToValue::to_value(&self.#member),
        });
    }

    // Every type parameter must be convertible for the accessor to compile
    let mut generics = input.generics.clone();
    let type_params: Vec<_> = generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.clone()),
            _ => None,
        })
        .collect();
    let where_clause = generics.make_where_clause();
    for ident in type_params {
        where_clause
            .predicates
            .push(syn::parse_quote!(#ident: ::rusty_validator::ToValue));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::rusty_validator::Validate for #name #ty_generics #where_clause {
            fn fields(&self) -> &'static [::rusty_validator::FieldDescriptor] {
                const FIELDS: &[::rusty_validator::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }

            fn field_value(&self, index: usize) -> ::rusty_validator::Value<'_> {
                match index {
                    #(#accessors)*
                    _ => ::rusty_validator::Value::Nil,
                }
            }
        }

        impl #impl_generics ::rusty_validator::ToValue for #name #ty_generics #where_clause {
            fn to_value(&self) -> ::rusty_validator::Value<'_> {
                ::rusty_validator::Value::Record(self)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn first_field_attrs(input: DeriveInput) -> Vec<syn::Attribute> {
        match input.data {
            Data::Struct(data) => data
                .fields
                .into_iter()
                .next()
                .map(|field| field.attrs)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_extract_tags() {
        let attrs = first_field_attrs(parse_quote! {
            struct Form {
                #[tag(validate = "min?3,max?40", json = "user_name")]
                #[doc = "ignored"]
                username: String
            }
        });

        let tags = extract_field_tags(&attrs).unwrap();
        assert_eq!(
            tags.tags,
            vec![
                ("validate".to_string(), "min?3,max?40".to_string()),
                ("json".to_string(), "user_name".to_string()),
            ]
        );
        assert!(!tags.skip);
    }

    #[test]
    fn test_tags_merge_across_attributes() {
        let attrs = first_field_attrs(parse_quote! {
            struct Form {
                #[tag(validate = "nonzero")]
                #[tag(json = "n", skip)]
                name: String
            }
        });

        let tags = extract_field_tags(&attrs).unwrap();
        assert_eq!(tags.tags.len(), 2);
        assert!(tags.skip);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let attrs = first_field_attrs(parse_quote! {
            struct Form {
                #[tag(validate = "min?1")]
                #[tag(validate = "max?2")]
                name: String
            }
        });

        let err = extract_field_tags(&attrs).unwrap_err();
        assert!(err.to_string().contains("duplicate tag `validate`"));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let attrs = first_field_attrs(parse_quote! {
            struct Form {
                #[tag(required)]
                name: String
            }
        });

        assert!(extract_field_tags(&attrs).is_err());
    }

    #[test]
    fn test_enum_is_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Choice { A, B }
        };

        let err = impl_validate(&input).unwrap_err();
        assert_eq!(err.to_string(), "Validate only supports structs");
    }

    #[test]
    fn test_generated_impl_skips_fields() {
        let input: DeriveInput = parse_quote! {
            struct Form {
                #[tag(validate = "nonzero")]
                name: String,
                #[tag(skip)]
                secret: Vec<u8>,
                age: u32,
            }
        };

        let output = impl_validate(&input).unwrap().to_string();
        assert!(output.contains("\"name\""));
        assert!(output.contains("\"age\""));
        assert!(!output.contains("\"secret\""));
    }

    #[test]
    fn test_generic_params_get_bounds() {
        let input: DeriveInput = parse_quote! {
            struct Page<T> {
                items: Vec<T>,
            }
        };

        let output = impl_validate(&input).unwrap().to_string();
        assert!(output.contains("where T"));
    }
}
