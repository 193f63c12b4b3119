use proc_macro2::Span;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, LitInt, LitStr, Type};

use crate::PERSIST_ATTRIBUTE_NAME;

/// `#[persist(...)]` on the type.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub type_name: Option<LitStr>,
    pub module: Option<LitStr>,
    pub version: Option<LitStr>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(PERSIST_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("type_name") {
                    parsed.type_name = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("module") {
                    parsed.module = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("version") {
                    parsed.version = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("auto_register") {
                    parsed.auto_register = Some(meta.path.span());
                } else {
                    return Err(meta.error("unsupported persist attribute on a type"));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }

    /// `TYPE_NAME` and `MODULE` items of the generated impl.
    pub fn identity(&self, ident: &Ident, gx_reflect: &syn::Path) -> proc_macro2::TokenStream {
        let type_name = match &self.type_name {
            Some(lit) => quote!(#lit),
            None => {
                let name = ident.to_string();
                quote!(::core::concat!(::core::module_path!(), "::", #name))
            }
        };
        let module = match &self.module {
            Some(lit) => quote!(#lit),
            None => quote!(::core::env!("CARGO_PKG_NAME")),
        };
        let version = match &self.version {
            Some(lit) => quote!(#lit),
            None => quote!(::core::env!("CARGO_PKG_VERSION")),
        };
        quote! {
            const TYPE_NAME: &'static str = #type_name;
            const MODULE: #gx_reflect::name::ModuleIdentity =
                #gx_reflect::name::ModuleIdentity::from_static(#module, #version);
        }
    }
}

/// `#[persist(...)]` on a field or variant.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub name: Option<LitStr>,
    pub arg: Option<(usize, Span)>,
    pub formatter: Option<Type>,
    pub private: bool,
    pub readonly: bool,
    pub base: bool,
    pub skip: bool,
}

impl FieldAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(PERSIST_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    parsed.name = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("arg") {
                    let lit: LitInt = meta.value()?.parse()?;
                    parsed.arg = Some((lit.base10_parse()?, lit.span()));
                } else if meta.path.is_ident("formatter") {
                    parsed.formatter = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("private") {
                    parsed.private = true;
                } else if meta.path.is_ident("readonly") {
                    parsed.readonly = true;
                } else if meta.path.is_ident("base") {
                    parsed.base = true;
                } else if meta.path.is_ident("skip") {
                    parsed.skip = true;
                } else {
                    return Err(meta.error("unsupported persist attribute on a field"));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}
