//! Implementation of #[derive(Injectable)] proc-macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, Meta,
    PathArguments, Type,
};

/// One `#[inject]` field.
struct InjectField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    /// `T` of `Option<Arc<T>>`
    target: Option<&'a Type>,
    item_name: Option<String>,
}

pub fn derive_injectable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => collect_fields(&data.fields)?,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Injectable can only be derived for structs",
            ))
        }
    };

    if fields.is_empty() {
        return Ok(quote! {
            impl #impl_generics ::ioc_registry::Injectable for #name #ty_generics #where_clause {}
        });
    }

    let infos = fields.iter().map(|field| {
        let field_name = field.ident.to_string();
        let field_type = field.ty;
        let target = match field.target {
            Some(target) => quote! { ::std::option::Option::Some(::ioc_registry::TypeKey::of::<#target>()) },
            None => quote! { ::std::option::Option::None },
        };
        let item_name = match &field.item_name {
            Some(item_name) => quote! { ::std::option::Option::Some(#item_name) },
            None => quote! { ::std::option::Option::None },
        };

        quote! {
            ::ioc_registry::InjectFieldInfo::new(
                #field_name,
                ::std::any::type_name::<#field_type>(),
                #target,
                #item_name,
            )
        }
    });

    // Only indirection fields get an assignment arm; the rest fall through
    // to the invalid-target error.
    let arms = fields.iter().filter_map(|field| {
        let target = field.target?;
        let ident = field.ident;
        let field_name = ident.to_string();

        Some(quote! {
            #field_name => {
                let value = value.downcast::<#target>().map_err(|_| {
                    ::ioc_registry::DiError::TypeMismatch {
                        field: ::std::string::ToString::to_string(field),
                        target: ::std::string::ToString::to_string(::std::any::type_name::<#target>()),
                    }
                })?;
                self.#ident = ::std::option::Option::Some(value);
                ::std::result::Result::Ok(())
            }
        })
    });

    let fallbacks = fields.iter().filter(|field| field.target.is_none()).map(|field| {
        let field_name = field.ident.to_string();
        let field_type = field.ty;
        quote! {
            #field_name => ::std::result::Result::Err(::ioc_registry::DiError::InvalidInjectionTarget {
                field: ::std::string::ToString::to_string(field),
                field_type: ::std::any::type_name::<#field_type>(),
            }),
        }
    });

    Ok(quote! {
        impl #impl_generics ::ioc_registry::Injectable for #name #ty_generics #where_clause {
            fn inject_fields() -> ::std::vec::Vec<::ioc_registry::InjectFieldInfo> {
                ::std::vec![#(#infos),*]
            }

            #[allow(unused_variables, unreachable_code)]
            fn assign(
                &mut self,
                field: &str,
                value: ::ioc_registry::AnyArc,
            ) -> ::ioc_registry::DiResult<()> {
                match field {
                    #(#arms)*
                    #(#fallbacks)*
                    _ => ::std::result::Result::Err(::ioc_registry::DiError::InvalidInjectionTarget {
                        field: ::std::string::ToString::to_string(field),
                        field_type: "<unknown field>",
                    }),
                }
            }
        }
    })
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<InjectField<'_>>> {
    let mut collected = Vec::new();

    for field in fields.iter() {
        let Some(attr) = field.attrs.iter().find(|attr| attr.path().is_ident("inject")) else {
            continue;
        };

        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(
                attr,
                "#[inject] is only supported on named fields",
            ));
        };

        collected.push(InjectField {
            ident,
            ty: &field.ty,
            target: option_arc_target(&field.ty),
            item_name: parse_item_name(attr)?,
        });
    }

    Ok(collected)
}

/// Parses `#[inject]`, `#[inject("cfg")]` and `#[inject(name = "cfg")]`.
fn parse_item_name(attr: &Attribute) -> syn::Result<Option<String>> {
    match &attr.meta {
        Meta::Path(_) => Ok(None),
        Meta::List(list) => {
            if let Ok(lit) = syn::parse2::<LitStr>(list.tokens.clone()) {
                return Ok(non_empty(lit.value()));
            }

            let mut item_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    item_name = non_empty(value.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `name = \"...\"`"))
                }
            })?;
            Ok(item_name)
        }
        Meta::NameValue(_) => Err(syn::Error::new_spanned(
            attr,
            "expected #[inject], #[inject(\"name\")] or #[inject(name = \"name\")]",
        )),
    }
}

fn non_empty(name: String) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// `T` if `ty` is `Option<Arc<T>>`, matched on the last path segments so
/// `std::option::Option<std::sync::Arc<T>>` works too.
fn option_arc_target(ty: &Type) -> Option<&Type> {
    let inner = single_generic_arg(ty, "Option")?;
    single_generic_arg(inner, "Arc")
}

fn single_generic_arg<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }

    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }

    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
