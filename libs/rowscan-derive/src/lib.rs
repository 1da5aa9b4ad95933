use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr, Token};

/// Derive macro binding struct fields to result-set columns.
///
/// Implements `rowscan::Record` and `rowscan::Destination` on the annotated
/// struct:
///
/// - `bindings()` — static table of tagged fields and their columns.
/// - `assign_field()` — converts a raw value into the field at an index.
/// - `bind_row()` — binds one row through `rowscan::record::bind_record`.
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct User {
///     #[tag(pg = "id", mysql = "user_id")]
///     pub id: i64,
///
///     #[tag(pg = "name")]
///     pub name: String,
///
///     // No #[tag]: never read or written by a scan.
///     pub cached: bool,
/// }
/// ```
///
/// A tag namespace that is not a Rust identifier is written as a string:
/// `#[tag("db-col" = "id")]`.
///
/// Tagged field types must implement `rowscan::FieldValue`.
#[proc_macro_derive(Record, attributes(tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Record only supports structs")),
    };

    let mut binding_tokens = Vec::new();
    let mut assign_tokens = Vec::new();

    for field in fields {
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_ident.to_string();
        let field_name_str = field_name_str.trim_start_matches("r#");

        // Parse #[tag(key = "column", "key" = "column", ...)] attributes.
        let mut tags: Vec<(String, String)> = Vec::new();
        let mut tagged = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("tag") {
                continue;
            }
            tagged = true;
            let entries =
                attr.parse_args_with(Punctuated::<TagEntry, Token![,]>::parse_terminated)?;
            for entry in entries {
                if tags.iter().any(|(k, _)| *k == entry.key) {
                    return Err(syn::Error::new(
                        entry.span,
                        format!("duplicate tag '{}'", entry.key),
                    ));
                }
                tags.push((entry.key, entry.column.value()));
            }
        }

        if !tagged {
            continue;
        }

        let index = binding_tokens.len();
        let tag_tokens = tags.iter().map(|(key, column)| {
            let key = LitStr::new(key, Span::call_site());
            let column = LitStr::new(column, Span::call_site());
            quote! { (#key, #column) }
        });

        binding_tokens.push(quote! {
            ::rowscan::FieldBinding::new(#field_name_str, &[#(#tag_tokens),*])
        });
        assign_tokens.push(quote! {
            #index => ::rowscan::convert::assign(&mut self.#field_ident, __raw, __options),
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::rowscan::Record for #name #ty_generics #where_clause {
            fn bindings() -> &'static [::rowscan::FieldBinding] {
                const __BINDINGS: &[::rowscan::FieldBinding] = &[
                    #(#binding_tokens),*
                ];
                __BINDINGS
            }

            fn assign_field(
                &mut self,
                __index: usize,
                __raw: &::rowscan::Value,
                __options: &::rowscan::ScanOptions,
            ) -> ::core::result::Result<(), ::rowscan::ScanError> {
                match __index {
                    #(#assign_tokens)*
                    _ => ::core::result::Result::Ok(()),
                }
            }
        }

        impl #impl_generics ::rowscan::Destination for #name #ty_generics #where_clause {
            const RECORD: bool = true;

            fn bind_row(
                &mut self,
                __row: &::rowscan::RawRow,
                __options: &::rowscan::ScanOptions,
            ) -> ::core::result::Result<(), ::rowscan::ScanError> {
                ::rowscan::record::bind_record(self, __row, __options)
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

/// One `key = "column"` pair inside `#[tag(...)]`.
struct TagEntry {
    key: String,
    span: Span,
    column: LitStr,
}

impl Parse for TagEntry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let (key, span) = if input.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            (lit.value(), lit.span())
        } else {
            // `parse_any` also admits keywords such as `type`.
            let ident = Ident::parse_any(input)
                .map_err(|e| syn::Error::new(e.span(), "expected `name = \"column\"`"))?;
            (ident.unraw().to_string(), ident.span())
        };
        if key.is_empty() {
            return Err(syn::Error::new(span, "tag name must not be empty"));
        }
        input.parse::<Token![=]>()?;
        let column: LitStr = input.parse()?;
        Ok(Self { key, span, column })
    }
}
