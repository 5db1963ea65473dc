//! Procedural macros for `required`
//!
//! This crate provides `#[derive(Record)]`, which registers a struct's
//! annotated fields with the validation engine:
//!
//! - `#[required]` - field must not hold its default value
//! - `#[required("yes, min=4, max=20")]` - tag string form
//! - `#[required(min = 4, max = 20)]` - separate `min` / `max` entries
//! - `#[required(rename = "name")]` - report the field under another name
//!
//! A struct-level `#[required(name = "...")]` overrides the record name used in
//! violations. Metadata is emitted verbatim and parsed by the engine on every
//! validation call, so malformed options surface at run time.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2, TokenTree};
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields,
    Ident, Lit, LitStr, Token, UnOp,
};

/// Derive `required::Record` and `required::Inspect` for a struct with named fields.
///
/// # Example
///
/// ```rust,ignore
/// use required::Record;
///
/// #[derive(Record)]
/// #[required(name = "User")]
/// struct CreateUser {
///     #[required("yes, min=3, max=50")]
///     username: String,
///
///     #[required(min = 18, max = 120)]
///     age: u8,
///
///     #[required(rename = "emailAddress")]
///     email: String,
///
///     // not validated
///     referrer: Option<String>,
/// }
/// ```
#[proc_macro_derive(Record, attributes(required))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let ident = input.ident.clone();
    let record_name = struct_name(&input.attrs)?.unwrap_or_else(|| ident.to_string());

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.clone(),
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "#[derive(Record)] requires a struct with named fields",
                ))
            }
        },
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "#[derive(Record)] is not supported on enums",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "#[derive(Record)] is not supported on unions",
            ))
        }
    };

    let mut calls = Vec::new();
    let mut field_types = Vec::new();

    for field in &named {
        let Some(attrs) = field_attrs(&field.attrs)? else {
            continue;
        };
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let name = attrs.rename.unwrap_or_else(|| unraw(field_ident));

        let call = match attrs.metadata {
            FieldMetadata::Tag(tag) => quote! {
                .tag(#name, &self.#field_ident, #tag)
            },
            FieldMetadata::Options { min, max } => {
                let min = optional_str(min);
                let max = optional_str(max);
                quote! {
                    .options(#name, &self.#field_ident, #min, #max)
                }
            }
        };
        calls.push(call);
        field_types.push(field.ty.clone());
    }

    // Only field types that mention a type parameter get a bound, so
    // self-referencing records still resolve.
    let params: Vec<Ident> = input
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    let where_clause = input.generics.make_where_clause();
    for ty in field_types
        .iter()
        .filter(|ty| mentions_any(quote!(#ty), &params))
    {
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::required::Inspect));
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let capacity = calls.len();

    Ok(quote! {
        impl #impl_generics ::required::Record for #ident #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #record_name
            }

            fn fields(&self) -> ::required::Fields<'_> {
                ::required::Fields::with_capacity(#capacity)
                    #(#calls)*
            }
        }

        impl #impl_generics ::required::Inspect for #ident #ty_generics #where_clause {
            fn inspect(&self) -> ::required::Value<'_> {
                ::required::Value::Record(self)
            }
        }
    })
}

enum FieldMetadata {
    Tag(String),
    Options {
        min: Option<String>,
        max: Option<String>,
    },
}

struct FieldAttrs {
    metadata: FieldMetadata,
    rename: Option<String>,
}

/// One argument inside `#[required(...)]`.
enum Arg {
    Tag(LitStr),
    Named(Ident, Expr),
}

impl syn::parse::Parse for Arg {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(Arg::Tag(input.parse()?));
        }
        let name: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        Ok(Arg::Named(name, input.parse()?))
    }
}

fn required_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("required"))
}

fn parse_args(attr: &Attribute) -> syn::Result<Vec<Arg>> {
    match &attr.meta {
        syn::Meta::Path(_) => Ok(Vec::new()),
        syn::Meta::List(_) => Ok(attr
            .parse_args_with(Punctuated::<Arg, Token![,]>::parse_terminated)?
            .into_iter()
            .collect()),
        syn::Meta::NameValue(nv) => Err(syn::Error::new_spanned(
            nv,
            "expected #[required] or #[required(...)]",
        )),
    }
}

fn struct_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;
    for attr in required_attrs(attrs) {
        for arg in parse_args(attr)? {
            match arg {
                Arg::Named(key, value) if key == "name" => {
                    name = Some(string_value(&value)?);
                }
                Arg::Named(key, _) => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unknown struct option `{key}`, expected `name`"),
                    ))
                }
                Arg::Tag(lit) => {
                    return Err(syn::Error::new(
                        lit.span(),
                        "tag strings belong on fields, not on the struct",
                    ))
                }
            }
        }
    }
    Ok(name)
}

fn field_attrs(attrs: &[Attribute]) -> syn::Result<Option<FieldAttrs>> {
    let mut found = false;
    let mut tag: Option<String> = None;
    let mut min = None;
    let mut max = None;
    let mut rename = None;

    for attr in required_attrs(attrs) {
        found = true;
        for arg in parse_args(attr)? {
            match arg {
                Arg::Tag(lit) => {
                    if tag.is_some() {
                        return Err(syn::Error::new(lit.span(), "duplicate tag string"));
                    }
                    tag = Some(lit.value());
                }
                Arg::Named(key, value) => {
                    let slot = if key == "min" {
                        &mut min
                    } else if key == "max" {
                        &mut max
                    } else if key == "rename" {
                        &mut rename
                    } else {
                        return Err(syn::Error::new(
                            key.span(),
                            format!("unknown option `{key}`, expected `min`, `max` or `rename`"),
                        ));
                    };
                    if slot.is_some() {
                        return Err(syn::Error::new(key.span(), format!("duplicate `{key}`")));
                    }
                    *slot = Some(string_value(&value)?);
                }
            }
        }
    }

    if !found {
        return Ok(None);
    }

    let metadata = match tag {
        Some(tag) => {
            if min.is_some() || max.is_some() {
                return Err(syn::Error::new(
                    Span::call_site(),
                    "use either a tag string or `min`/`max` entries, not both",
                ));
            }
            FieldMetadata::Tag(tag)
        }
        None if min.is_none() && max.is_none() => FieldMetadata::Tag("yes".to_string()),
        None => FieldMetadata::Options { min, max },
    };

    Ok(Some(FieldAttrs { metadata, rename }))
}

/// Stringify an option value. Integers keep their digits, strings are taken
/// verbatim so the engine can judge them.
fn string_value(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(int), ..
        }) => Ok(int.base10_digits().to_string()),
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => match expr.as_ref() {
            Expr::Lit(ExprLit {
                lit: Lit::Int(int), ..
            }) => Ok(format!("-{}", int.base10_digits())),
            other => Err(syn::Error::new_spanned(other, "expected an integer literal")),
        },
        other => Err(syn::Error::new_spanned(
            other,
            "expected an integer or string literal",
        )),
    }
}

fn optional_str(value: Option<String>) -> TokenStream2 {
    match value {
        Some(value) => quote!(::core::option::Option::Some(#value)),
        None => quote!(::core::option::Option::None),
    }
}

fn mentions_any(tokens: TokenStream2, params: &[Ident]) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => params.contains(&ident),
        TokenTree::Group(group) => mentions_any(group.stream(), params),
        _ => false,
    })
}

fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
}
