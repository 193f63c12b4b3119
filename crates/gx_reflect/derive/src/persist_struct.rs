use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields};

use crate::attributes::{FieldAttributes, TypeAttributes};

pub(crate) fn impl_persist(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &ast.ident;
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "`Persist` cannot be derived for generic types",
        ));
    }
    let fields = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "`Persist` can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "`Persist` can only be derived for structs, use `PersistEnum` for enums",
            ));
        }
    };

    let gx_reflect = crate::path::gx_reflect();
    let type_attrs = TypeAttributes::parse(&ast.attrs)?;
    let identity = type_attrs.identity(ident, &gx_reflect);

    let mut members = Vec::new();
    let mut args = Vec::new();
    let mut inits = Vec::new();

    for field in fields {
        let attrs = FieldAttributes::parse(&field.attrs)?;
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;

        match attrs.arg {
            Some((index, span)) => {
                let var = format_ident!("__arg{}", index);
                args.push((index, span, var.clone(), ty.clone()));
                inits.push(quote!(#field_ident: #var));
            }
            None => inits.push(quote!(#field_ident: ::core::default::Default::default())),
        }

        if attrs.skip {
            if attrs.arg.is_some() {
                return Err(syn::Error::new_spanned(field_ident, "a skipped field cannot be a constructor argument"));
            }
            continue;
        }

        if attrs.base {
            members.push(quote! {
                desc.extends(|s: &Self| &s.#field_ident, |s: &mut Self| &mut s.#field_ident);
            });
            continue;
        }

        let declared = field_ident.to_string();
        let mut member = if attrs.readonly {
            quote! {
                desc.readonly_field(#declared, |s: &Self| &s.#field_ident)
            }
        } else {
            quote! {
                desc.field(#declared, |s: &Self| &s.#field_ident, |s: &mut Self| &mut s.#field_ident)
            }
        };
        if let Some(name) = &attrs.name {
            member.extend(quote!(.rename(#name)));
        }
        if let Some((index, _)) = attrs.arg {
            member.extend(quote!(.arg(#index)));
        }
        if let Some(formatter) = &attrs.formatter {
            member.extend(quote!(.formatter::<#formatter>()));
        }
        if attrs.private {
            member.extend(quote!(.private()));
        }
        members.push(quote!(#member;));
    }

    args.sort_by_key(|(index, ..)| *index);
    for (expected, (index, span, ..)) in args.iter().enumerate() {
        if *index != expected {
            return Err(syn::Error::new(
                *span,
                format!("constructor argument indices must be contiguous from 0, expected {expected}"),
            ));
        }
    }
    let vars = args.iter().map(|(_, _, var, _)| var);
    let tys = args.iter().map(|(.., ty)| ty);

    let auto_register = auto_register(&type_attrs, &gx_reflect, quote!(#ident));

    Ok(quote! {
        impl #gx_reflect::registry::Persist for #ident {
            #identity

            fn describe(desc: &mut #gx_reflect::descriptor::DescriptorBuilder<Self>) {
                desc.constructor(|(#(#vars,)*): (#(#tys,)*)| Self { #(#inits,)* });
                #(#members)*
            }
        }

        #auto_register
    })
}

#[cfg(feature = "auto_register")]
pub(crate) fn auto_register(
    attrs: &TypeAttributes,
    gx_reflect: &syn::Path,
    target: TokenStream,
) -> TokenStream {
    match attrs.auto_register {
        Some(span) => quote::quote_spanned! { span =>
            #gx_reflect::impl_auto_register!(#target);
        },
        None => TokenStream::new(),
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn auto_register(_: &TypeAttributes, _: &syn::Path, _: TokenStream) -> TokenStream {
    TokenStream::new()
}
