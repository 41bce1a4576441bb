//! Implementation of the Record derive macro.
//!
//! Generates an `odb_core::Record` implementation from the struct's named
//! fields plus `#[record(...)]` attributes, and one accessor method per
//! declared relation.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Attribute, Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Result, Type};

/// Parsed definition of a struct with `#[derive(Record)]`.
#[derive(Debug)]
pub struct RecordDef {
    pub name: Ident,
    pub generics: syn::Generics,
    /// `#[record(table = "...")]`.
    pub table: Option<String>,
    /// Persisted and relation-backing fields, in declaration order.
    pub fields: Vec<RecordFieldDef>,
    pub relations: Vec<RelationAttr>,
}

#[derive(Debug)]
pub struct RecordFieldDef {
    pub name: Ident,
    pub ty: Type,
}

/// Parsed `#[record(relation(...))]`.
#[derive(Debug)]
pub struct RelationAttr {
    pub name: String,
    pub to_many: bool,
    pub target: Type,
    pub column: Option<String>,
    pub property: Option<String>,
}

/// Parse a `DeriveInput` into a `RecordDef`.
pub fn parse_record(input: &DeriveInput) -> Result<RecordDef> {
    let fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not unions",
            ));
        }
    };

    if !fields.iter().any(|f| f.name == "id") {
        return Err(Error::new_spanned(
            &input.ident,
            "Record requires an `id: Option<i64>` field",
        ));
    }

    let (table, relations) = parse_struct_attrs(&input.attrs)?;

    Ok(RecordDef {
        name: input.ident.clone(),
        generics: input.generics.clone(),
        table,
        fields,
        relations,
    })
}

fn parse_fields(fields: &Fields) -> Result<Vec<RecordFieldDef>> {
    match fields {
        Fields::Named(named) => {
            let mut parsed = Vec::new();
            for field in &named.named {
                if let Some(def) = parse_field(field)? {
                    parsed.push(def);
                }
            }
            Ok(parsed)
        }
        Fields::Unnamed(_) | Fields::Unit => Err(Error::new_spanned(
            fields,
            "Record requires a struct with named fields",
        )),
    }
}

/// Parse one field; `None` when it carries `#[record(skip)]`.
fn parse_field(field: &Field) -> Result<Option<RecordFieldDef>> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                let attr_name = meta.path.to_token_stream().to_string();
                Err(meta.error(format!(
                    "unknown record field attribute `{attr_name}`. Valid attributes are: skip"
                )))
            }
        })?;
    }

    if skip && name == "id" {
        return Err(Error::new_spanned(field, "the `id` field cannot be skipped"));
    }

    Ok((!skip).then(|| RecordFieldDef {
        name,
        ty: field.ty.clone(),
    }))
}

fn parse_struct_attrs(attrs: &[Attribute]) -> Result<(Option<String>, Vec<RelationAttr>)> {
    let mut table = None;
    let mut relations = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(Error::new_spanned(value, "table name cannot be empty"));
                }
                table = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("relation") {
                let mut name = None;
                let mut to_many = false;
                let mut target = None;
                let mut column = None;
                let mut property = None;

                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("name") {
                        let value: LitStr = inner.value()?.parse()?;
                        name = Some(value);
                    } else if inner.path.is_ident("kind") {
                        let value: LitStr = inner.value()?.parse()?;
                        to_many = match value.value().as_str() {
                            "to_one" => false,
                            "to_many" => true,
                            other => {
                                return Err(Error::new_spanned(
                                    &value,
                                    format!("unknown relation kind `{other}`, expected \"to_one\" or \"to_many\""),
                                ));
                            }
                        };
                    } else if inner.path.is_ident("target") {
                        target = Some(inner.value()?.parse::<Type>()?);
                    } else if inner.path.is_ident("column") {
                        let value: LitStr = inner.value()?.parse()?;
                        column = Some(value.value());
                    } else if inner.path.is_ident("property") {
                        let value: LitStr = inner.value()?.parse()?;
                        property = Some(value.value());
                    } else {
                        let attr_name = inner.path.to_token_stream().to_string();
                        return Err(inner.error(format!(
                            "unknown relation attribute `{attr_name}`. \
                             Valid attributes are: name, kind, target, column, property"
                        )));
                    }
                    Ok(())
                })?;

                let name = name.ok_or_else(|| meta.error("relation requires `name = \"...\"`"))?;
                if syn::parse_str::<Ident>(&name.value()).is_err() {
                    return Err(Error::new_spanned(
                        &name,
                        "relation name must be a valid identifier",
                    ));
                }
                let target = target.ok_or_else(|| meta.error("relation requires `target = Type`"))?;

                relations.push(RelationAttr {
                    name: name.value(),
                    to_many,
                    target,
                    column,
                    property,
                });
                Ok(())
            } else {
                let attr_name = meta.path.to_token_stream().to_string();
                Err(meta.error(format!(
                    "unknown record attribute `{attr_name}`. Valid attributes are: table, relation"
                )))
            }
        })?;
    }

    Ok((table, relations))
}

fn option_str(value: Option<&String>) -> TokenStream {
    match value {
        Some(v) => quote! { ::core::option::Option::Some(#v) },
        None => quote! { ::core::option::Option::None },
    }
}

/// Generate the `Record` implementation and relation accessors.
pub fn generate_record_impl(def: &RecordDef) -> TokenStream {
    let name = &def.name;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = def.generics.split_for_impl();

    let table = option_str(def.table.as_ref());
    let field_names: Vec<String> = def.fields.iter().map(|f| f.name.to_string()).collect();

    let relation_defs = def.relations.iter().map(|rel| {
        let rel_name = &rel.name;
        let target = &rel.target;
        let kind = if rel.to_many {
            quote! { ::odb::__private::odb_core::RelationKind::ToMany }
        } else {
            quote! { ::odb::__private::odb_core::RelationKind::ToOne }
        };
        let column = option_str(rel.column.as_ref());
        let property = option_str(rel.property.as_ref());
        quote! {
            ::odb::__private::odb_core::RelationDef {
                name: #rel_name,
                kind: #kind,
                target: <#target as ::odb::__private::odb_core::Record>::TYPE_NAME,
                match_column: #column,
                local_property: #property,
            }
        }
    });

    let getters = def.fields.iter().map(|f| {
        let ident = &f.name;
        let key = ident.to_string();
        quote! {
            #key => ::core::option::Option::Some(::odb::__private::odb_core::Value::from(
                ::core::clone::Clone::clone(&self.#ident),
            )),
        }
    });

    let setters = def.fields.iter().map(|f| {
        let ident = &f.name;
        let ty = &f.ty;
        let key = ident.to_string();
        quote! {
            #key => self.#ident = <#ty as ::odb::__private::odb_core::FromValue>::from_value(value)?,
        }
    });

    let accessors = def.relations.iter().map(|rel| {
        let method = Ident::new(&rel.name, name.span());
        let rel_name = &rel.name;
        let target = &rel.target;
        if rel.to_many {
            quote! {
                /// Load this relation's target records.
                pub fn #method<D, E>(
                    &self,
                    engine: &::odb::__private::odb_engine::Engine<D, E>,
                ) -> ::odb::__private::odb_core::Result<::std::vec::Vec<#target>>
                where
                    D: ::odb::__private::odb_core::Driver,
                    E: ::odb::__private::odb_query::QueryEncoder,
                {
                    engine.related_many::<Self, #target>(self, #rel_name)
                }
            }
        } else {
            quote! {
                /// Load this relation's target record.
                pub fn #method<D, E>(
                    &self,
                    engine: &::odb::__private::odb_engine::Engine<D, E>,
                ) -> ::odb::__private::odb_core::Result<::core::option::Option<#target>>
                where
                    D: ::odb::__private::odb_core::Driver,
                    E: ::odb::__private::odb_query::QueryEncoder,
                {
                    engine.related_one::<Self, #target>(self, #rel_name)
                }
            }
        }
    });

    let accessor_impl = if def.relations.is_empty() {
        TokenStream::new()
    } else {
        quote! {
            impl #impl_generics #name #ty_generics #where_clause {
                #(#accessors)*
            }
        }
    };

    quote! {
        impl #impl_generics ::odb::__private::odb_core::Record for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const TABLE: ::core::option::Option<&'static str> = #table;
            const FIELDS: &'static [&'static str] = &[#(#field_names),*];
            const RELATIONS: &'static [::odb::__private::odb_core::RelationDef] = &[#(#relation_defs),*];

            fn id(&self) -> ::core::option::Option<i64> {
                self.id
            }

            fn set_id(&mut self, id: ::core::option::Option<i64>) {
                self.id = id;
            }

            fn field_value(&self, name: &str) -> ::core::option::Option<::odb::__private::odb_core::Value> {
                match name {
                    #(#getters)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_field_value(
                &mut self,
                name: &str,
                value: ::odb::__private::odb_core::Value,
            ) -> ::odb::__private::odb_core::Result<bool> {
                match name {
                    #(#setters)*
                    _ => return ::core::result::Result::Ok(false),
                }
                ::core::result::Result::Ok(true)
            }
        }

        #accessor_impl
    }
}
