//! Derive macro for form models.
//!
//! This crate provides `#[derive(FormModel)]`, which implements the
//! `oxide_fields::FormModel` trait with explicit per-attribute accessors.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, Meta, Path};

/// Derives `oxide_fields::FormModel` for a struct with named fields.
///
/// # Attributes
///
/// - `#[form(name = "LoginForm")]` - Form name prefixing input names
///   (optional, defaults to the struct name)
/// - `#[form(rules = path::to::fn)]` - Function `fn(&Self) -> RuleList`
///   returning the validation rules
///
/// # Field Attributes
///
/// - `#[field(errors)]` - The `FormErrors` container (required, exactly one)
/// - `#[field(label = "...", hint = "...", placeholder = "...")]`
/// - `#[field(nested)]` - The field holds a nested form model
/// - `#[field(skip)]` - The field is not a form attribute
///
/// Plain attribute values are read with `serde_json::to_value`, so their
/// types must implement `Serialize`. A value that fails to convert (a map
/// with non-string keys, say) surfaces as `FieldError::UnreadableAttribute`
/// when a field resolves it.
#[proc_macro_derive(FormModel, attributes(form, field))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_form_model_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_form_model_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let form_attrs = parse_form_attrs(&input.attrs)?;
    let form_name = form_attrs.name.unwrap_or_else(|| struct_name.to_string());
    let model_name = struct_name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "FormModel derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "FormModel derive only supports structs",
            ));
        }
    };

    let mut attributes: Vec<AttributeInfo> = Vec::new();
    let mut errors_field: Option<Ident> = None;
    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let field_attrs = parse_field_attrs(&field.attrs)?;
        if field_attrs.errors {
            if errors_field.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field can be marked #[field(errors)]",
                ));
            }
            errors_field = Some(ident);
            continue;
        }
        if field_attrs.skip {
            continue;
        }
        attributes.push(AttributeInfo {
            name: ident.to_string().trim_start_matches("r#").to_string(),
            ident,
            nested: field_attrs.nested,
            label: field_attrs.label,
            hint: field_attrs.hint,
            placeholder: field_attrs.placeholder,
        });
    }

    let Some(errors_field) = errors_field else {
        return Err(syn::Error::new_spanned(
            &input,
            "FormModel derive requires a field marked #[field(errors)]",
        ));
    };

    let all_names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();

    let value_arms: Vec<TokenStream2> = attributes
        .iter()
        .filter(|a| !a.nested)
        .map(|a| {
            let name = &a.name;
            let ident = &a.ident;
            quote! {
                #name => ::oxide_fields::__private::serde_json::to_value(&self.#ident)
                    .map(::std::option::Option::Some)
                    .map_err(|e| ::std::string::ToString::to_string(&e)),
            }
        })
        .collect();

    let nested_arms: Vec<TokenStream2> = attributes
        .iter()
        .filter(|a| a.nested)
        .map(|a| {
            let name = &a.name;
            let ident = &a.ident;
            quote! {
                #name => Some(&self.#ident as &dyn ::oxide_fields::FormModel),
            }
        })
        .collect();

    let label_arms = text_arms(&attributes, |a| a.label.as_deref());
    let hint_arms = text_arms(&attributes, |a| a.hint.as_deref());
    let placeholder_arms = text_arms(&attributes, |a| a.placeholder.as_deref());

    let rules_impl = form_attrs.rules.map(|rules| {
        quote! {
            fn rules(&self) -> ::oxide_fields::model::RuleList {
                #rules(self)
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::oxide_fields::FormModel for #struct_name #ty_generics #where_clause {
            fn form_name(&self) -> &str {
                #form_name
            }

            fn model_name(&self) -> &str {
                #model_name
            }

            fn attribute_names(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![#(::std::string::String::from(#all_names)),*]
            }

            fn attribute_value(
                &self,
                name: &str,
            ) -> ::std::option::Option<::oxide_fields::__private::serde_json::Value> {
                <Self as ::oxide_fields::FormModel>::read_attribute(self, name)
                    .ok()
                    .flatten()
            }

            fn read_attribute(
                &self,
                name: &str,
            ) -> ::std::result::Result<
                ::std::option::Option<::oxide_fields::__private::serde_json::Value>,
                ::std::string::String,
            > {
                match name {
                    #(#value_arms)*
                    _ => ::std::result::Result::Ok(::std::option::Option::None),
                }
            }

            fn nested_model(
                &self,
                name: &str,
            ) -> ::std::option::Option<&dyn ::oxide_fields::FormModel> {
                match name {
                    #(#nested_arms)*
                    _ => None,
                }
            }

            fn attribute_label(&self, name: &str) -> ::std::option::Option<::std::string::String> {
                match name {
                    #(#label_arms)*
                    _ => None,
                }
            }

            fn attribute_hint(&self, name: &str) -> ::std::option::Option<::std::string::String> {
                match name {
                    #(#hint_arms)*
                    _ => None,
                }
            }

            fn attribute_placeholder(
                &self,
                name: &str,
            ) -> ::std::option::Option<::std::string::String> {
                match name {
                    #(#placeholder_arms)*
                    _ => None,
                }
            }

            #rules_impl

            fn form_errors(&self) -> &::oxide_fields::FormErrors {
                &self.#errors_field
            }

            fn form_errors_mut(&mut self) -> &mut ::oxide_fields::FormErrors {
                &mut self.#errors_field
            }
        }
    })
}

fn text_arms(
    attributes: &[AttributeInfo],
    text: impl Fn(&AttributeInfo) -> Option<&str>,
) -> Vec<TokenStream2> {
    attributes
        .iter()
        .filter_map(|a| {
            let value = text(a)?;
            let name = &a.name;
            Some(quote! {
                #name => Some(::std::string::String::from(#value)),
            })
        })
        .collect()
}

struct AttributeInfo {
    ident: Ident,
    name: String,
    nested: bool,
    label: Option<String>,
    hint: Option<String>,
    placeholder: Option<String>,
}

#[derive(Default)]
struct FormAttrs {
    name: Option<String>,
    rules: Option<Path>,
}

#[derive(Default)]
struct FieldAttrs {
    label: Option<String>,
    hint: Option<String>,
    placeholder: Option<String>,
    nested: bool,
    skip: bool,
    errors: bool,
}

fn string_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    if let Expr::Lit(lit) = &value {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(value, "expected a string literal"))
}

fn parse_form_attrs(attrs: &[Attribute]) -> syn::Result<FormAttrs> {
    let mut result = FormAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("form") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                result.name = Some(string_value(&meta)?);
            } else if meta.path.is_ident("rules") {
                result.rules = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unsupported form attribute"));
            }
            Ok(())
        })?;
    }
    Ok(result)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("field") {
            continue;
        }
        // Handle empty attribute like #[field]
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("label") {
                result.label = Some(string_value(&meta)?);
            } else if meta.path.is_ident("hint") {
                result.hint = Some(string_value(&meta)?);
            } else if meta.path.is_ident("placeholder") {
                result.placeholder = Some(string_value(&meta)?);
            } else if meta.path.is_ident("nested") {
                result.nested = true;
            } else if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("errors") {
                result.errors = true;
            } else {
                return Err(meta.error("unsupported field attribute"));
            }
            Ok(())
        })?;
    }
    Ok(result)
}
