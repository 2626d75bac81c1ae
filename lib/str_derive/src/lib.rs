use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derives `Display` and `FromStr` through the enum's serde names, plus an
/// `ALL` constant listing every variant in declaration order.
///
/// Only fieldless enums are supported.
#[proc_macro_derive(Str)]
pub fn str_macro_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;

    let variants = match &ast.data {
        Data::Enum(data) => &data.variants,
        _ => return quote! {compile_error!("Str supports only enums");}.into(),
    };

    if variants.iter().any(|v| !matches!(v.fields, Fields::Unit)) {
        return quote! {compile_error!("Str supports only fieldless variants");}.into();
    }

    let idents = variants.iter().map(|v| &v.ident);
    let count = variants.len();

    let gen = quote! {
        impl #name {
            pub const ALL: [#name; #count] = [#(#name::#idents),*];
        }

        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.serialize(f)
            }
        }

        impl std::str::FromStr for #name {
            type Err = serde::de::value::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                use serde::de::IntoDeserializer;

                Self::deserialize(s.into_deserializer())
            }
        }
    };

    gen.into()
}
