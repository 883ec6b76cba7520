use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, Type, Variant};

/// Per-variant facts extracted up front so generation is a set of plain loops.
struct ErrorVariant {
    ident: Ident,
    source: Option<(Ident, Type)>,
    has_context: bool,
    cfg_attrs: Vec<syn::Attribute>,
}

pub fn expand(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "hearth_error can only be applied to enums")
            .to_compile_error();
    };

    let mut variants = Vec::with_capacity(data.variants.len());
    for v in &data.variants {
        match inspect_variant(v) {
            Ok(meta) => variants.push(meta),
            Err(e) => return e.to_compile_error(),
        }
    }

    let name = &input.ident;
    let ext_trait = format_ident!("{name}Ext");

    let derives = missing_derives(&input);
    let ext = expand_ext_trait(name, &ext_trait, &variants);
    let froms: TokenStream = variants.iter().map(|v| expand_from(name, &ext_trait, v)).collect();
    let fallback = expand_internal_fallback(name, &variants);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #ext
        #froms
        #fallback

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

fn inspect_variant(v: &Variant) -> syn::Result<ErrorVariant> {
    let Fields::Named(fields) = &v.fields else {
        return Err(syn::Error::new_spanned(
            v,
            "hearth_error requires named fields for source/context handling",
        ));
    };

    let mut source = None;
    let mut has_context = false;

    for field in &fields.named {
        let Some(ident) = &field.ident else { continue };
        let marked = field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"));
        if ident == "source" || marked {
            source = Some((ident.clone(), field.ty.clone()));
        } else if ident == "context" {
            if !is_context_type(&field.ty) {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "context field must be Option<Cow<'static, str>>",
                ));
            }
            has_context = true;
        }
    }

    if source.is_some() && !has_context {
        return Err(syn::Error::new_spanned(
            &v.ident,
            "hearth_error requires `context: Option<Cow<'static, str>>` for variants with a source",
        ));
    }

    let cfg_attrs = v.attrs.iter().filter(|a| a.path().is_ident("cfg")).cloned().collect();

    Ok(ErrorVariant { ident: v.ident.clone(), source, has_context, cfg_attrs })
}

/// Injects `Debug` and `thiserror::Error` unless the enum already derives them.
fn missing_derives(input: &DeriveInput) -> TokenStream {
    let mut present = Vec::new();
    for attr in &input.attrs {
        if attr.path().is_ident("derive") {
            let _ = attr.parse_nested_meta(|meta| {
                if let Some(seg) = meta.path.segments.last() {
                    present.push(seg.ident.to_string());
                }
                Ok(())
            });
        }
    }

    let mut wanted = Vec::new();
    if !present.iter().any(|t| t == "Debug") {
        wanted.push(quote!(Debug));
    }
    if !present.iter().any(|t| t == "Error") {
        wanted.push(quote!(::thiserror::Error));
    }

    if wanted.is_empty() { quote!() } else { quote!(#[derive(#(#wanted),*)]) }
}

fn expand_ext_trait(name: &Ident, ext_trait: &Ident, variants: &[ErrorVariant]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let ident = &v.ident;
        let cfg_attrs = &v.cfg_attrs;
        quote! { #(#cfg_attrs)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
    });

    quote! {
        pub trait #ext_trait<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext_trait<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    match &mut e {
                        #( #arms )*
                        _ => {}
                    }
                    e
                })
            }
        }
    }
}

/// `From<Source>` plus `.context()` on `Result<_, Source>` for each wrapping variant.
fn expand_from(name: &Ident, ext_trait: &Ident, v: &ErrorVariant) -> TokenStream {
    if v.ident == "Internal" {
        return quote!();
    }
    let Some((field, ty)) = &v.source else { return quote!() };
    let ident = &v.ident;
    let cfg_attrs = &v.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
        }

        #(#cfg_attrs)*
        impl<T> #ext_trait<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
            }
        }
    }
}

fn expand_internal_fallback(name: &Ident, variants: &[ErrorVariant]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == "Internal") else {
        return quote!();
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

/// Textual check that a type is `Option<Cow<'static, str>>` (paths may be qualified).
fn is_context_type(ty: &Type) -> bool {
    let rendered = ty.to_token_stream().to_string().replace(' ', "");
    rendered.ends_with("Option<Cow<'static,str>>")
        || rendered.ends_with("Option<std::borrow::Cow<'static,str>>")
}
