//! `#[base_entity]` attribute for sea-orm models.
//!
//! Injects the `id`, `created_at` and `updated_at` columns every table in the
//! service carries, and implements the DAO traits that stamp them on insert and
//! update. `label = "..."` names the record in user facing error messages.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Expr, ExprLit, Field, Fields, Ident, ItemStruct, Lit, LitStr, Meta, Path, Token,
    parse_macro_input, parse_quote, punctuated::Punctuated,
};

struct Options {
    traits: Path,
    label: Option<LitStr>,
}

impl Options {
    fn parse(args: Punctuated<Meta, Token![,]>) -> syn::Result<Self> {
        let mut options = Self {
            traits: parse_quote!(crate::db::dao::base_traits),
            label: None,
        };

        for meta in args {
            let Meta::NameValue(pair) = meta else {
                return Err(syn::Error::new_spanned(
                    meta,
                    "expected `key = \"value\"`, e.g. label = \"Post\"",
                ));
            };
            let Expr::Lit(ExprLit {
                lit: Lit::Str(value),
                ..
            }) = pair.value
            else {
                return Err(syn::Error::new_spanned(
                    pair.value,
                    "expected a string literal",
                ));
            };

            if pair.path.is_ident("traits") {
                options.traits = value.parse()?;
            } else if pair.path.is_ident("label") {
                options.label = Some(value);
            } else {
                return Err(syn::Error::new_spanned(
                    pair.path,
                    "unknown base_entity key, expected `traits` or `label`",
                ));
            }
        }

        Ok(options)
    }
}

#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let mut input = parse_macro_input!(item as ItemStruct);

    match expand(args, &mut input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(
    args: Punctuated<Meta, Token![,]>,
    input: &mut ItemStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let options = Options::parse(args)?;

    let Fields::Named(fields) = &mut input.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "base_entity requires a struct with named fields",
        ));
    };

    let has = |name: &str| {
        fields
            .named
            .iter()
            .any(|field| field.ident.as_ref().is_some_and(|ident| ident == name))
    };

    let mut injected: Vec<Field> = Vec::new();
    if !has("id") {
        injected.push(parse_quote! {
            #[sea_orm(primary_key, auto_increment = false)]
            pub id: uuid::Uuid
        });
    }
    for name in ["created_at", "updated_at"] {
        if !has(name) {
            let ident = Ident::new(name, Span::call_site());
            injected.push(parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub #ident: sea_orm::entity::prelude::DateTimeWithTimeZone
            });
        }
    }

    let declared = std::mem::take(&mut fields.named);
    fields.named = injected.into_iter().chain(declared).collect();

    let traits = &options.traits;
    let label = options
        .label
        .unwrap_or_else(|| LitStr::new("Data", Span::call_site()));

    Ok(quote! {
        #input

        impl #traits::HasIdActiveModel for ActiveModel {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.id = sea_orm::ActiveValue::Set(id);
            }
        }

        impl #traits::TimestampedActiveModel for ActiveModel {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.updated_at = sea_orm::ActiveValue::Set(ts);
            }
        }

        impl #traits::HasCreatedAtColumn for Entity {
            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }

        impl #traits::EntityLabel for Entity {
            const LABEL: &'static str = #label;
        }
    })
}
