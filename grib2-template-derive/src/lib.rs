//! Derive macros implementing the `grib2-template-helpers` traits for
//! structures whose named fields are stored one after another in octet order.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

#[proc_macro_derive(TryFromSlice)]
pub fn derive_try_from_slice(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    expand(&input, |input, fields| {
        let ident = &input.ident;
        let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
        let names = field_names(fields);
        let types = fields.iter().map(|f| &f.ty);
        quote! {
            impl #impl_generics ::grib2_template_helpers::TryFromSlice
                for #ident #ty_generics #where_clause
            {
                fn try_from_slice(
                    slice: &[u8],
                    pos: &mut usize,
                ) -> ::grib2_template_helpers::TryFromSliceResult<Self> {
                    #(
                        let #names =
                            <#types as ::grib2_template_helpers::TryFromSlice>::try_from_slice(
                                slice, pos,
                            )?;
                    )*
                    Ok(Self { #(#names,)* })
                }
            }
        }
    })
}

#[proc_macro_derive(WriteToSlice)]
pub fn derive_write_to_slice(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    expand(&input, |input, fields| {
        let ident = &input.ident;
        let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
        let names = field_names(fields);
        quote! {
            impl #impl_generics ::grib2_template_helpers::WriteToSlice
                for #ident #ty_generics #where_clause
            {
                fn write_to_slice(
                    &self,
                    slice: &mut [u8],
                    pos: &mut usize,
                ) -> ::grib2_template_helpers::WriteToSliceResult {
                    #(
                        ::grib2_template_helpers::WriteToSlice::write_to_slice(
                            &self.#names, slice, pos,
                        )?;
                    )*
                    Ok(())
                }
            }
        }
    })
}

#[proc_macro_derive(OctetSize)]
pub fn derive_octet_size(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    expand(&input, |input, fields| {
        let ident = &input.ident;
        let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
        let names = field_names(fields);
        quote! {
            impl #impl_generics ::grib2_template_helpers::OctetSize
                for #ident #ty_generics #where_clause
            {
                fn octet_size(&self) -> usize {
                    0 #(+ ::grib2_template_helpers::OctetSize::octet_size(&self.#names))*
                }
            }
        }
    })
}

/// Derives `Dump`, printing each field with its doc comment, and `DumpField`,
/// so that the structure can be nested in another one.
#[proc_macro_derive(Dump)]
pub fn derive_dump(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    expand(&input, |input, fields| {
        let ident = &input.ident;
        let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
        let names = field_names(fields);
        let labels = names.iter().map(|name| name.to_string());
        let docs = fields.iter().map(|f| get_doc(&f.attrs));
        quote! {
            impl #impl_generics ::grib2_template_helpers::Dump
                for #ident #ty_generics #where_clause
            {
                fn dump<W: std::io::Write>(
                    &self,
                    parent: Option<&std::borrow::Cow<str>>,
                    pos: &mut usize,
                    output: &mut W,
                ) -> Result<(), std::io::Error> {
                    #(
                        ::grib2_template_helpers::DumpField::dump_field(
                            &self.#names,
                            #labels,
                            parent,
                            #docs,
                            pos,
                            output,
                        )?;
                    )*
                    Ok(())
                }
            }

            impl #impl_generics ::grib2_template_helpers::DumpField
                for #ident #ty_generics #where_clause
            {
                fn dump_field<W: std::io::Write>(
                    &self,
                    name: &str,
                    parent: Option<&std::borrow::Cow<str>>,
                    _doc: &str,
                    pos: &mut usize,
                    output: &mut W,
                ) -> Result<(), std::io::Error> {
                    ::grib2_template_helpers::dump_nested(self, name, parent, pos, output)
                }
            }
        }
    })
}

type NamedFields = syn::punctuated::Punctuated<syn::Field, syn::Token![,]>;

fn expand<F>(input: &syn::DeriveInput, f: F) -> TokenStream
where
    F: FnOnce(&syn::DeriveInput, &NamedFields) -> TokenStream2,
{
    match &input.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => f(input, &fields.named).into(),
        _ => syn::Error::new_spanned(
            &input.ident,
            "only structs with named fields are supported",
        )
        .to_compile_error()
        .into(),
    }
}

fn field_names(fields: &NamedFields) -> Vec<&syn::Ident> {
    fields.iter().filter_map(|f| f.ident.as_ref()).collect()
}

/// Joins the lines of the doc comment, which is empty if there is none.
fn get_doc(attrs: &[syn::Attribute]) -> String {
    let mut doc = String::new();
    for attr in attrs.iter() {
        match attr.meta {
            syn::Meta::NameValue(ref value) if value.path.is_ident("doc") => {
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) = &value.value
                {
                    doc.push_str(&s.value());
                }
            }
            _ => {}
        }
    }
    doc.trim().to_owned()
}
