use darling::{FromDeriveInput, FromField, util::Ignored};
use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::{DeriveInput, Ident, Type, parse_macro_input, parse_quote, spanned::Spanned};

#[derive(FromDeriveInput)]
#[darling(supports(struct_named))]
struct DescribeInput {
    data: darling::ast::Data<Ignored, DescribedField>,
    generics: syn::Generics,
    ident: Ident,
}

#[derive(Debug)]
struct DescribedField {
    ident: Ident,
    ty: Type,
    // The raw value of `#[rest = "..."]`, if present.
    tag: Option<syn::LitStr>,
}

impl FromField for DescribedField {
    fn from_field(field: &syn::Field) -> darling::Result<Self> {
        let Some(ident) = field.ident.clone() else {
            return Err(darling::Error::custom("`Describe` only supports named fields").with_span(field));
        };
        let mut tag = None;
        // Other attributes (docs, serde, ...) are none of our business.
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("rest")) {
            if tag.is_some() {
                return Err(
                    darling::Error::custom("`#[rest]` can only be specified once per field")
                        .with_span(attr),
                );
            }
            let syn::Meta::NameValue(meta) = &attr.meta else {
                return Err(darling::Error::custom(
                    "Expected a string literal.\nFor example, `#[rest = \"required,name\"]`.",
                )
                .with_span(attr));
            };
            tag = Some(<syn::LitStr as darling::FromMeta>::from_expr(&meta.value)?);
        }
        Ok(Self {
            ident,
            ty: field.ty.clone(),
            tag,
        })
    }
}

pub(super) fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match _derive_describe(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn _derive_describe(input: DeriveInput) -> Result<proc_macro2::TokenStream, darling::Error> {
    let input = DescribeInput::from_derive_input(&input)?;
    let struct_ident = &input.ident;
    let Some(fields) = input.data.take_struct() else {
        return Err(
            darling::Error::custom("`Describe` only supports structs with named fields")
                .with_span(struct_ident),
        );
    };

    let descriptors = fields.iter().map(|field| {
        let name = field.ident.unraw().to_string();
        let ty = &field.ty;
        let metadata = match &field.tag {
            Some(tag) => quote! { ::restbind::descriptor::FieldMetadata::parse(#tag) },
            None => quote! { ::restbind::descriptor::FieldMetadata::default() },
        };
        quote_spanned! { ty.span() =>
            ::restbind::descriptor::FieldDescriptor::new(
                #name,
                <#ty as ::restbind::Describe>::descriptor(),
                #metadata,
            )
        }
    });

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::restbind::Describe));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let name = struct_ident.to_string();

    Ok(quote! {
        impl #impl_generics ::restbind::Describe for #struct_ident #ty_generics #where_clause {
            fn descriptor() -> ::restbind::descriptor::TypeDescriptor {
                ::restbind::descriptor::TypeDescriptor::record(
                    #name,
                    ::std::vec![#(#descriptors),*],
                )
            }
        }
    })
}
