use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::attributes::{FieldAttributes, TypeAttributes};
use crate::persist_struct::auto_register;

pub(crate) fn impl_persist_enum(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &ast.ident;
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "`PersistEnum` cannot be derived for generic types",
        ));
    }
    let Data::Enum(data) = &ast.data else {
        return Err(syn::Error::new_spanned(
            ident,
            "`PersistEnum` can only be derived for enums",
        ));
    };

    let gx_reflect = crate::path::gx_reflect();
    let type_attrs = TypeAttributes::parse(&ast.attrs)?;
    let identity = type_attrs.identity(ident, &gx_reflect);

    let mut variants = Vec::with_capacity(data.variants.len());
    let mut names = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "`PersistEnum` only supports unit variants",
            ));
        }
        let attrs = FieldAttributes::parse(&variant.attrs)?;
        let name = match attrs.name {
            Some(lit) => lit.value(),
            None => variant.ident.to_string(),
        };
        variants.push(&variant.ident);
        names.push(name);
    }

    let auto_register = auto_register(&type_attrs, &gx_reflect, quote!(enum #ident));

    Ok(quote! {
        impl #gx_reflect::registry::PersistEnum for #ident {
            #identity
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#variants => #names,)*
                }
            }

            fn from_variant(name: &str) -> ::core::option::Option<Self> {
                match name {
                    #(#names => ::core::option::Option::Some(Self::#variants),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #gx_reflect::value::IntoValue for #ident {
            fn into_value(self) -> #gx_reflect::value::Value {
                #gx_reflect::value::Value::Enum(
                    #gx_reflect::registry::PersistEnum::to_enum_value(&self),
                )
            }
        }

        impl #gx_reflect::value::FromValue for #ident {
            fn accepts(value: &#gx_reflect::value::Value) -> bool {
                matches!(
                    value,
                    #gx_reflect::value::Value::Enum(e)
                        if e.ty().as_str() == <Self as #gx_reflect::registry::PersistEnum>::TYPE_NAME
                )
            }

            fn from_value(
                value: #gx_reflect::value::Value,
            ) -> ::core::result::Result<Self, #gx_reflect::value::ValueError> {
                match value {
                    #gx_reflect::value::Value::Enum(e) => {
                        <Self as #gx_reflect::registry::PersistEnum>::from_enum_value(&e)
                    }
                    other => ::core::result::Result::Err(#gx_reflect::value::ValueError::Mismatch {
                        expected: <Self as #gx_reflect::registry::PersistEnum>::TYPE_NAME,
                        found: other.kind(),
                    }),
                }
            }
        }

        #auto_register
    })
}
