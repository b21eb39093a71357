//! Derive macro for remodel record descriptors.
//!
//! `#[derive(Record)]` on a named struct emits the `Record` and `Field`
//! implementations the copy driver works through. Fields rename with
//! `#[record(rename = "...")]`. The type must also be `Clone` and
//! `Default`: clones feed whole-record values, defaults feed the
//! allocator.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Visibility};

/// Derive `Record` (and the matching `Field` impl) for a named struct.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "Record requires named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record only derives for structs",
            ))
        }
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record does not support generic parameters",
        ));
    }

    let ident = &input.ident;
    let name = ident.to_string();

    let mut defs = Vec::new();
    let mut get_arms = Vec::new();
    let mut set_arms = Vec::new();

    for field in fields {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let field_name = field_ident.to_string();
        let ty = &field.ty;
        let public = matches!(field.vis, Visibility::Public(_));
        let rename = rename_attr(field)?;
        let rename_tokens = match &rename {
            Some(lit) => quote!(::core::option::Option::Some(#lit)),
            None => quote!(::core::option::Option::None),
        };

        defs.push(quote! {
            ::remodel_core::FieldDef {
                name: #field_name,
                rename: #rename_tokens,
                public: #public,
                shape: <#ty as ::remodel_core::Field>::shape,
            }
        });

        get_arms.push(quote! {
            #field_name => ::core::option::Option::Some(
                ::remodel_core::Field::load(&self.#field_ident),
            ),
        });

        // Only public fields get a set arm; writing anything else falls
        // through to the unknown-field error.
        if public {
            set_arms.push(quote! {
                #field_name => match <#ty as ::remodel_core::Field>::store(value) {
                    ::core::result::Result::Ok(v) => {
                        self.#field_ident = v;
                        ::core::result::Result::Ok(())
                    }
                    ::core::result::Result::Err(rejected) => {
                        ::core::result::Result::Err(
                            ::remodel_core::CopyError::ShapeMismatch {
                                slot: ::std::format!("{}.{}", #name, #field_name),
                                expected: <#ty as ::remodel_core::Field>::shape().to_string(),
                                found: rejected.kind_name().to_string(),
                            },
                        )
                    }
                },
            });
        }
    }

    Ok(quote! {
        #[automatically_derived]
        impl ::remodel_core::Record for #ident {
            fn type_name(&self) -> &'static str {
                #name
            }

            fn fields(&self) -> &'static [::remodel_core::FieldDef] {
                const FIELDS: &[::remodel_core::FieldDef] = &[#(#defs),*];
                FIELDS
            }

            fn get(&self, field: &str) -> ::core::option::Option<::remodel_core::Value> {
                match field {
                    #(#get_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set(
                &mut self,
                field: &str,
                value: ::remodel_core::Value,
            ) -> ::remodel_core::CopyResult<()> {
                match field {
                    #(#set_arms)*
                    _ => ::core::result::Result::Err(
                        ::remodel_core::CopyError::UnknownField {
                            record: #name,
                            field: field.to_string(),
                        },
                    ),
                }
            }

            fn clone_record(&self) -> ::std::boxed::Box<dyn ::remodel_core::Record> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }

        #[automatically_derived]
        impl ::remodel_core::Field for #ident {
            fn shape() -> ::remodel_core::Shape {
                ::remodel_core::Shape::Record(
                    ::remodel_core::RecordShape::of::<#ident>(#name),
                )
            }

            fn load(&self) -> ::remodel_core::Value {
                ::remodel_core::Value::Record(::std::boxed::Box::new(
                    ::core::clone::Clone::clone(self),
                ))
            }

            fn store(
                value: ::remodel_core::Value,
            ) -> ::core::result::Result<Self, ::remodel_core::Value> {
                match value {
                    ::remodel_core::Value::Record(record) => {
                        match record.as_any().downcast_ref::<#ident>() {
                            ::core::option::Option::Some(concrete) => {
                                ::core::result::Result::Ok(
                                    ::core::clone::Clone::clone(concrete),
                                )
                            }
                            ::core::option::Option::None => ::core::result::Result::Err(
                                ::remodel_core::Value::Record(record),
                            ),
                        }
                    }
                    other => ::core::result::Result::Err(other),
                }
            }
        }
    })
}

fn rename_attr(field: &syn::Field) -> syn::Result<Option<LitStr>> {
    let mut rename = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit);
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute; expected `rename`"))
            }
        })?;
    }
    Ok(rename)
}
