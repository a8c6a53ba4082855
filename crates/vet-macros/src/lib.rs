use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::Token;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Index, Lit, LitStr,
    Meta, Visibility,
};

/// Derive `vet::Walk`. See the `vet` crate docs for the accepted attributes.
#[proc_macro_derive(Walk, attributes(vet, serde))]
pub fn derive_walk(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let shape = match &input.data {
        Data::Struct(data) => struct_shape(&data.fields)?,
        Data::Enum(data) => {
            let fieldless = data
                .variants
                .iter()
                .all(|variant| matches!(variant.fields, Fields::Unit));
            if fieldless {
                quote! { ::vet::Shape::Scalar }
            } else {
                let mut arms = Vec::new();
                for variant in &data.variants {
                    arms.push(variant_arm(&variant.ident, &variant.fields)?);
                }
                quote! {
                    match self {
                        #( #arms )*
                    }
                }
            }
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Walk)] is not supported on unions",
            ))
        }
    };

    let explicit = explicit_contract(&input.attrs)?;
    let contract = if explicit {
        quote! { ::core::option::Option::Some(self as &dyn ::vet::Validate) }
    } else {
        quote! {
            #[allow(unused_imports)]
            use ::vet::__private::{ViaValidate as _, ViaWalk as _};
            (&::vet::__private::Probe(self)).vet_contract()
        }
    };

    let ident = &input.ident;
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::vet::Walk));
    }
    if explicit {
        let (_, ty_generics, _) = input.generics.split_for_impl();
        generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(#ident #ty_generics: ::vet::Validate));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::vet::Walk for #ident #ty_generics #where_clause {
            fn shape(&self) -> ::vet::Shape<'_> {
                #shape
            }

            fn contract(&self) -> ::core::option::Option<&dyn ::vet::Validate> {
                #contract
            }
        }
    })
}

/// `#[vet(validate)]` on the type: the `Validate` impl is required rather than
/// detected, so impls with extra bounds are still called.
fn explicit_contract(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut validate = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("vet")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("validate") {
                validate = true;
                Ok(())
            } else {
                Err(meta.error("unsupported vet container attribute, expected `validate`"))
            }
        })?;
    }
    Ok(validate)
}

/// What the derive learned about one field.
struct FieldSpec {
    name: String,
    visible: bool,
    opaque: bool,
    json: Option<String>,
    yaml: Option<String>,
    form: Option<String>,
}

impl FieldSpec {
    fn parse(field: &syn::Field, index: usize, always_visible: bool) -> syn::Result<Self> {
        let mut spec = FieldSpec {
            name: field
                .ident
                .as_ref()
                .map(|ident| ident.unraw().to_string())
                .unwrap_or_else(|| index.to_string()),
            visible: always_visible || !matches!(field.vis, Visibility::Inherited),
            opaque: false,
            json: None,
            yaml: None,
            form: None,
        };
        let mut serde_rename: Option<String> = None;
        let mut serde_skip = false;

        for attr in &field.attrs {
            if attr.path().is_ident("vet") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("json") {
                        spec.json = Some(meta.value()?.parse::<LitStr>()?.value());
                    } else if meta.path.is_ident("yaml") {
                        spec.yaml = Some(meta.value()?.parse::<LitStr>()?.value());
                    } else if meta.path.is_ident("form") {
                        spec.form = Some(meta.value()?.parse::<LitStr>()?.value());
                    } else if meta.path.is_ident("opaque") {
                        spec.opaque = true;
                    } else {
                        return Err(meta.error(
                            "unsupported vet attribute, expected `json`, `yaml`, `form` or `opaque`",
                        ));
                    }
                    Ok(())
                })?;
            } else if attr.path().is_ident("serde") {
                // Only `rename = ".."` and `skip` matter here; anything else is serde's business.
                let Meta::List(list) = &attr.meta else {
                    continue;
                };
                let metas = Punctuated::<Meta, Token![,]>::parse_terminated
                    .parse2(list.tokens.clone())
                    .unwrap_or_default();
                for meta in metas {
                    match meta {
                        Meta::Path(path) if path.is_ident("skip") => serde_skip = true,
                        Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                            if let Expr::Lit(ExprLit {
                                lit: Lit::Str(s), ..
                            }) = &nv.value
                            {
                                serde_rename = Some(s.value());
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if spec.json.is_none() {
            spec.json = if serde_skip {
                Some("-".to_string())
            } else {
                serde_rename
            };
        }
        Ok(spec)
    }

    /// Whether the validator descends into this field's value.
    fn walked(&self) -> bool {
        self.visible && !self.opaque
    }

    fn info(&self) -> TokenStream2 {
        let name = &self.name;
        let visible = self.visible;
        let json = tag(&self.json);
        let yaml = tag(&self.yaml);
        let form = tag(&self.form);
        quote! {
            ::vet::FieldInfo::new(#name, #visible, ::vet::Tags::new(#json, #yaml, #form))
        }
    }
}

fn tag(value: &Option<String>) -> TokenStream2 {
    match value {
        Some(s) => quote! { ::core::option::Option::Some(#s) },
        None => quote! { ::core::option::Option::None },
    }
}

fn parse_fields(fields: &Fields, always_visible: bool) -> syn::Result<Vec<FieldSpec>> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| FieldSpec::parse(field, index, always_visible))
        .collect()
}

/// A block building `Shape::Record` from the field specs and, for walked
/// fields, an expression borrowing the value.
fn record(specs: &[FieldSpec], values: &[Option<TokenStream2>]) -> TokenStream2 {
    let count = specs.len();
    if count == 0 {
        return quote! { ::vet::Shape::Record(::vet::Record::new(::std::vec::Vec::new())) };
    }
    let infos = specs.iter().map(FieldSpec::info);
    let entries = values.iter().enumerate().map(|(index, value)| match value {
        Some(expr) => quote! { ::vet::Field::new(&FIELDS[#index], #expr) },
        None => quote! { ::vet::Field::opaque(&FIELDS[#index]) },
    });
    quote! {{
        static FIELDS: [::vet::FieldInfo; #count] = [ #( #infos ),* ];
        ::vet::Shape::Record(::vet::Record::new(::std::vec![ #( #entries ),* ]))
    }}
}

fn struct_shape(fields: &Fields) -> syn::Result<TokenStream2> {
    if matches!(fields, Fields::Unit) {
        return Ok(quote! { ::vet::Shape::Scalar });
    }
    let specs = parse_fields(fields, false)?;
    let values: Vec<Option<TokenStream2>> = fields
        .iter()
        .zip(&specs)
        .enumerate()
        .map(|(index, (field, spec))| {
            spec.walked().then(|| match &field.ident {
                Some(ident) => quote! { &self.#ident },
                None => {
                    let index = Index::from(index);
                    quote! { &self.#index }
                }
            })
        })
        .collect();
    Ok(record(&specs, &values))
}

fn variant_arm(variant: &syn::Ident, fields: &Fields) -> syn::Result<TokenStream2> {
    let specs = parse_fields(fields, true)?;
    let bindings: Vec<_> = (0..specs.len())
        .map(|index| format_ident!("__vet_field_{}", index))
        .collect();
    let values: Vec<Option<TokenStream2>> = specs
        .iter()
        .zip(&bindings)
        .map(|(spec, binding)| spec.walked().then(|| quote! { #binding }))
        .collect();
    let body = record(&specs, &values);

    let pattern = match fields {
        Fields::Unit => quote! { Self::#variant },
        Fields::Named(_) => {
            let mut pieces: Vec<TokenStream2> = fields
                .iter()
                .zip(&specs)
                .zip(&bindings)
                .filter(|((_, spec), _)| spec.walked())
                .map(|((field, _), binding)| {
                    let ident = &field.ident;
                    quote! { #ident: #binding }
                })
                .collect();
            pieces.push(quote! { .. });
            quote! { Self::#variant { #( #pieces ),* } }
        }
        Fields::Unnamed(_) => {
            let pieces = specs.iter().zip(&bindings).map(|(spec, binding)| {
                if spec.walked() {
                    quote! { #binding }
                } else {
                    quote! { _ }
                }
            });
            quote! { Self::#variant( #( #pieces ),* ) }
        }
    };

    Ok(quote! { #pattern => #body, })
}
