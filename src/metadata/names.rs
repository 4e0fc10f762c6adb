//! Display names of types and methods.
//!
//! Names follow the common .NET full name rendering, which is stable across independently
//! compiled or rewritten copies of a module because it never mentions metadata tokens:
//!
//! - types: `Namespace.Name`, nested types `Namespace.Outer/Inner`
//! - primitives by their `System` type: `System.Int32`, `System.String`, ...
//! - constructed types: `T[]`, `T[0...,0...]`, `T&`, `T*`, `T pinned`, `T modopt(M)`,
//!   `T modreq(M)`, `List`1<System.String>`, `method System.Void *(System.Int32)`
//! - generic parameters by their declared name, `!0` / `!!0` when it is unknown
//! - methods: `ReturnType DeclaringType::Name(Param1,Param2)`
//!
//! [`MetadataNames`] resolves tokens against the tables of one module; the formatting functions
//! only depend on the [`NameLookup`] trait.

use std::collections::HashMap;

use crate::{
    metadata::{
        signatures::{
            parse_method_signature, parse_type_spec_signature, SignatureArray, SignatureMethod,
            TypeSignature,
        },
        tables::{
            GenericParamRaw, MetadataTable, MethodDefRaw, NestedClassRaw, TableId, TypeDefRaw,
            TypeRefRaw, TypeSpecRaw,
        },
        token::Token,
        view::MetadataView,
    },
    Error::RecursionLimit,
    Result,
};

/// Maximum nesting while resolving names (enclosing types, `TypeSpec` references)
const MAX_NAME_DEPTH: usize = 64;

/// The generic parameters in scope of a signature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericContext {
    /// `TypeDef` owning `!n` parameters
    pub type_owner: Option<Token>,
    /// `MethodDef` owning `!!n` parameters
    pub method_owner: Option<Token>,
}

/// Resolution of the names a signature refers to
pub trait NameLookup {
    /// Full name of a `TypeDef`, `TypeRef` or `TypeSpec`
    ///
    /// # Errors
    /// Returns an error if the token can not be resolved.
    fn token_name(&self, token: Token, context: &GenericContext, depth: usize) -> Result<String>;

    /// Declared name of generic parameter `number` of `owner`
    fn generic_param_name(&self, owner: Token, number: u32) -> Option<String>;
}

/// Render `signature` as a full type name
///
/// # Errors
/// Returns an error if a referenced token can not be resolved, or nesting exceeds the limit.
pub fn format_type<L: NameLookup + ?Sized>(
    lookup: &L,
    signature: &TypeSignature,
    context: &GenericContext,
    depth: usize,
) -> Result<String> {
    if depth >= MAX_NAME_DEPTH {
        return Err(RecursionLimit(MAX_NAME_DEPTH));
    }
    let next = depth + 1;

    let name = match signature {
        TypeSignature::Void => "System.Void".to_string(),
        TypeSignature::Boolean => "System.Boolean".to_string(),
        TypeSignature::Char => "System.Char".to_string(),
        TypeSignature::I1 => "System.SByte".to_string(),
        TypeSignature::U1 => "System.Byte".to_string(),
        TypeSignature::I2 => "System.Int16".to_string(),
        TypeSignature::U2 => "System.UInt16".to_string(),
        TypeSignature::I4 => "System.Int32".to_string(),
        TypeSignature::U4 => "System.UInt32".to_string(),
        TypeSignature::I8 => "System.Int64".to_string(),
        TypeSignature::U8 => "System.UInt64".to_string(),
        TypeSignature::R4 => "System.Single".to_string(),
        TypeSignature::R8 => "System.Double".to_string(),
        TypeSignature::String => "System.String".to_string(),
        TypeSignature::I => "System.IntPtr".to_string(),
        TypeSignature::U => "System.UIntPtr".to_string(),
        TypeSignature::Object => "System.Object".to_string(),
        TypeSignature::TypedByRef => "System.TypedReference".to_string(),
        TypeSignature::Ptr(inner) => format!("{}*", format_type(lookup, inner, context, next)?),
        TypeSignature::ByRef(inner) => format!("{}&", format_type(lookup, inner, context, next)?),
        TypeSignature::Pinned(inner) => {
            format!("{} pinned", format_type(lookup, inner, context, next)?)
        }
        TypeSignature::Sentinel(inner) => format_type(lookup, inner, context, next)?,
        TypeSignature::ValueType(token) | TypeSignature::Class(token) => {
            lookup.token_name(*token, context, next)?
        }
        TypeSignature::GenericParamType(number) => context
            .type_owner
            .and_then(|owner| lookup.generic_param_name(owner, *number))
            .unwrap_or_else(|| format!("!{number}")),
        TypeSignature::GenericParamMethod(number) => context
            .method_owner
            .and_then(|owner| lookup.generic_param_name(owner, *number))
            .unwrap_or_else(|| format!("!!{number}")),
        TypeSignature::SzArray(inner) => {
            format!("{}[]", format_type(lookup, inner, context, next)?)
        }
        TypeSignature::Array(array) => format!(
            "{}{}",
            format_type(lookup, &array.base, context, next)?,
            array_suffix(array)
        ),
        TypeSignature::GenericInst(base, args) => {
            let mut name = format_type(lookup, base, context, next)?;
            name.push('<');
            for (index, arg) in args.iter().enumerate() {
                if index > 0 {
                    name.push(',');
                }
                name.push_str(&format_type(lookup, arg, context, next)?);
            }
            name.push('>');
            name
        }
        TypeSignature::FnPtr(method) => {
            let mut name = format!(
                "method {} *",
                format_type(lookup, &method.return_type, context, next)?
            );
            name.push_str(&format_parameters(lookup, method, context, next)?);
            name
        }
        TypeSignature::ModifiedRequired(modifier, inner) => format!(
            "{} modreq({})",
            format_type(lookup, inner, context, next)?,
            lookup.token_name(*modifier, context, next)?
        ),
        TypeSignature::ModifiedOptional(modifier, inner) => format!(
            "{} modopt({})",
            format_type(lookup, inner, context, next)?,
            lookup.token_name(*modifier, context, next)?
        ),
    };

    Ok(name)
}

/// `[]` for unbounded single dimension arrays, otherwise one `lower...upper` entry per
/// dimension with the unknown parts left out
fn array_suffix(array: &SignatureArray) -> String {
    let rank = array.rank.max(1) as usize;
    let dimensions: Vec<String> = (0..rank)
        .map(|index| {
            let dimension = array.dimensions.get(index);
            let lower = dimension.and_then(|dimension| dimension.lower_bound);
            let size = dimension.and_then(|dimension| dimension.size);
            match lower {
                None => String::new(),
                Some(lower) => match size {
                    Some(size) => {
                        format!("{}...{}", lower, i64::from(lower) + i64::from(size) - 1)
                    }
                    None => format!("{lower}..."),
                },
            }
        })
        .collect();

    if rank == 1 && dimensions[0].is_empty() {
        return "[]".to_string();
    }

    format!("[{}]", dimensions.join(","))
}

/// `(P1,P2)`, with `...,` in front of the first variable argument
fn format_parameters<L: NameLookup + ?Sized>(
    lookup: &L,
    method: &SignatureMethod,
    context: &GenericContext,
    depth: usize,
) -> Result<String> {
    let mut name = String::from("(");
    for (index, param) in method.params.iter().enumerate() {
        if index > 0 {
            name.push(',');
        }
        if matches!(param, TypeSignature::Sentinel(_)) {
            name.push_str("...,");
        }
        name.push_str(&format_type(lookup, param, context, depth)?);
    }
    name.push(')');

    Ok(name)
}

/// Render `ReturnType DeclaringType::Name(Params)`
///
/// # Errors
/// Returns an error if a referenced token can not be resolved.
pub fn format_method<L: NameLookup + ?Sized>(
    lookup: &L,
    declaring_type: &str,
    name: &str,
    signature: &SignatureMethod,
    context: &GenericContext,
) -> Result<String> {
    Ok(format!(
        "{} {}::{}{}",
        format_type(lookup, &signature.return_type, context, 0)?,
        declaring_type,
        name,
        format_parameters(lookup, signature, context, 0)?
    ))
}

fn join_namespace(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Name resolution against the tables of one module
pub struct MetadataNames<'m, 'a> {
    metadata: &'m MetadataView<'a>,
    typedefs: Option<MetadataTable<'a, TypeDefRaw>>,
    typerefs: Option<MetadataTable<'a, TypeRefRaw>>,
    typespecs: Option<MetadataTable<'a, TypeSpecRaw>>,
    enclosing: HashMap<u32, u32>,
    generic_params: HashMap<(Token, u32), &'a str>,
}

impl<'m, 'a> MetadataNames<'m, 'a> {
    /// Index the nesting and generic parameter tables of `metadata`
    ///
    /// # Errors
    /// Returns an error if the tables stream is missing or a row can not be decoded.
    pub fn new(metadata: &'m MetadataView<'a>) -> Result<Self> {
        let tables = metadata.tables()?;

        let mut enclosing = HashMap::new();
        if let Some(nested) = tables.table::<NestedClassRaw>() {
            for row in nested.iter() {
                let row = row?;
                enclosing.insert(row.nested_class, row.enclosing_class);
            }
        }

        let mut generic_params = HashMap::new();
        if let Some(params) = tables.table::<GenericParamRaw>() {
            for row in params.iter() {
                let row = row?;
                generic_params.insert((row.owner.token(), row.number), metadata.string(row.name)?);
            }
        }

        Ok(MetadataNames {
            metadata,
            typedefs: tables.table::<TypeDefRaw>(),
            typerefs: tables.table::<TypeRefRaw>(),
            typespecs: tables.table::<TypeSpecRaw>(),
            enclosing,
            generic_params,
        })
    }

    /// Returns true if the `TypeDef` row `rid` is nested in another type
    #[must_use]
    pub fn is_nested(&self, rid: u32) -> bool {
        self.enclosing.contains_key(&rid)
    }

    /// Full name of the `TypeDef` row `rid`
    ///
    /// # Errors
    /// Returns an error if the row or one of its enclosing types can not be read.
    pub fn type_def_name(&self, rid: u32) -> Result<String> {
        self.type_def_name_at(rid, 0)
    }

    fn type_def_name_at(&self, rid: u32, depth: usize) -> Result<String> {
        if depth >= MAX_NAME_DEPTH {
            return Err(RecursionLimit(MAX_NAME_DEPTH));
        }

        let row = self
            .typedefs
            .as_ref()
            .ok_or_else(|| malformed_error!("Missing TypeDef table for row {}", rid))?
            .try_get(rid)?;
        let name = join_namespace(
            self.metadata.string(row.type_namespace)?,
            self.metadata.string(row.type_name)?,
        );

        match self.enclosing.get(&rid) {
            Some(outer) => Ok(format!("{}/{}", self.type_def_name_at(*outer, depth + 1)?, name)),
            None => Ok(name),
        }
    }

    /// Full name of the `TypeRef` row `rid`
    ///
    /// # Errors
    /// Returns an error if the row or its resolution scope can not be read.
    pub fn type_ref_name(&self, rid: u32) -> Result<String> {
        self.type_ref_name_at(rid, 0)
    }

    fn type_ref_name_at(&self, rid: u32, depth: usize) -> Result<String> {
        if depth >= MAX_NAME_DEPTH {
            return Err(RecursionLimit(MAX_NAME_DEPTH));
        }

        let row = self
            .typerefs
            .as_ref()
            .ok_or_else(|| malformed_error!("Missing TypeRef table for row {}", rid))?
            .try_get(rid)?;
        let name = join_namespace(
            self.metadata.string(row.type_namespace)?,
            self.metadata.string(row.type_name)?,
        );

        if row.resolution_scope.tag == TableId::TypeRef && !row.resolution_scope.is_null() {
            return Ok(format!(
                "{}/{}",
                self.type_ref_name_at(row.resolution_scope.row, depth + 1)?,
                name
            ));
        }

        Ok(name)
    }

    /// Full signature name of a method declared by the `TypeDef` row `declaring_rid`
    ///
    /// # Errors
    /// Returns an error if the signature blob is malformed or refers to unknown types.
    pub fn method_name(&self, method: &MethodDefRaw, declaring_rid: u32) -> Result<String> {
        let declaring_type = self.type_def_name(declaring_rid)?;
        let signature = parse_method_signature(self.metadata.blob(method.signature)?)?;
        let context = GenericContext {
            type_owner: Some(Token::from_parts(TableId::TypeDef as u8, declaring_rid)),
            method_owner: Some(method.token),
        };

        format_method(
            self,
            &declaring_type,
            self.metadata.string(method.name)?,
            &signature,
            &context,
        )
    }
}

impl NameLookup for MetadataNames<'_, '_> {
    fn token_name(&self, token: Token, context: &GenericContext, depth: usize) -> Result<String> {
        match TableId::try_from(token.table()) {
            Ok(TableId::TypeDef) => self.type_def_name_at(token.row(), depth),
            Ok(TableId::TypeRef) => self.type_ref_name_at(token.row(), depth),
            Ok(TableId::TypeSpec) => {
                let row = self
                    .typespecs
                    .as_ref()
                    .ok_or_else(|| malformed_error!("Missing TypeSpec table for {}", token))?
                    .try_get(token.row())?;
                let spec = parse_type_spec_signature(self.metadata.blob(row.signature)?)?;
                format_type(self, &spec.base, context, depth + 1)
            }
            _ => Err(malformed_error!("Token {} does not name a type", token)),
        }
    }

    fn generic_param_name(&self, owner: Token, number: u32) -> Option<String> {
        self.generic_params
            .get(&(owner, number))
            .map(|name| (*name).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::signatures::{parse_method_signature, ArrayDimensions};

    struct FixedNames {
        types: HashMap<Token, &'static str>,
        params: HashMap<(Token, u32), &'static str>,
    }

    impl NameLookup for FixedNames {
        fn token_name(&self, token: Token, _: &GenericContext, _: usize) -> Result<String> {
            self.types
                .get(&token)
                .map(|name| (*name).to_string())
                .ok_or_else(|| malformed_error!("unknown token {}", token))
        }

        fn generic_param_name(&self, owner: Token, number: u32) -> Option<String> {
            self.params.get(&(owner, number)).map(|name| (*name).to_string())
        }
    }

    const LIST: Token = Token(0x0100_0001);
    const IS_VOLATILE: Token = Token(0x0100_0002);
    const IS_CONST: Token = Token(0x0100_0003);
    const OWNER_TYPE: Token = Token(0x0200_0002);
    const OWNER_METHOD: Token = Token(0x0600_0001);

    fn lookup() -> FixedNames {
        FixedNames {
            types: HashMap::from([
                (LIST, "System.Collections.Generic.List`1"),
                (IS_VOLATILE, "System.Runtime.CompilerServices.IsVolatile"),
                (IS_CONST, "System.Runtime.CompilerServices.IsConst"),
            ]),
            params: HashMap::from([((OWNER_TYPE, 0), "T"), ((OWNER_METHOD, 0), "TResult")]),
        }
    }

    fn name(signature: &TypeSignature, context: &GenericContext) -> String {
        format_type(&lookup(), signature, context, 0).unwrap()
    }

    #[test]
    fn primitives_and_constructed() {
        let context = GenericContext::default();
        let int = || Box::new(TypeSignature::I4);

        assert_eq!(name(&TypeSignature::I4, &context), "System.Int32");
        assert_eq!(name(&TypeSignature::U, &context), "System.UIntPtr");
        assert_eq!(name(&TypeSignature::SzArray(int()), &context), "System.Int32[]");
        assert_eq!(name(&TypeSignature::ByRef(int()), &context), "System.Int32&");
        assert_eq!(name(&TypeSignature::Ptr(int()), &context), "System.Int32*");
        assert_eq!(
            name(&TypeSignature::Pinned(int()), &context),
            "System.Int32 pinned"
        );
        assert_eq!(
            name(
                &TypeSignature::GenericInst(
                    Box::new(TypeSignature::Class(LIST)),
                    vec![TypeSignature::String]
                ),
                &context
            ),
            "System.Collections.Generic.List`1<System.String>"
        );
    }

    #[test]
    fn modifiers_inner_first() {
        let signature = TypeSignature::ModifiedOptional(
            IS_CONST,
            Box::new(TypeSignature::ModifiedRequired(
                IS_VOLATILE,
                Box::new(TypeSignature::I4),
            )),
        );

        assert_eq!(
            name(&signature, &GenericContext::default()),
            "System.Int32 modreq(System.Runtime.CompilerServices.IsVolatile) \
             modopt(System.Runtime.CompilerServices.IsConst)"
        );
    }

    #[test]
    fn generic_parameters() {
        let context = GenericContext {
            type_owner: Some(OWNER_TYPE),
            method_owner: Some(OWNER_METHOD),
        };
        assert_eq!(name(&TypeSignature::GenericParamType(0), &context), "T");
        assert_eq!(name(&TypeSignature::GenericParamMethod(0), &context), "TResult");
        assert_eq!(name(&TypeSignature::GenericParamType(1), &context), "!1");
        assert_eq!(
            name(&TypeSignature::GenericParamMethod(0), &GenericContext::default()),
            "!!0"
        );
    }

    #[test]
    fn arrays() {
        let array = |rank, dimensions| {
            TypeSignature::Array(SignatureArray {
                base: Box::new(TypeSignature::I4),
                rank,
                dimensions,
            })
        };
        let context = GenericContext::default();

        let zero_based = ArrayDimensions {
            size: None,
            lower_bound: Some(0),
        };
        assert_eq!(
            name(&array(2, vec![zero_based.clone(), zero_based]), &context),
            "System.Int32[0...,0...]"
        );
        assert_eq!(name(&array(1, Vec::new()), &context), "System.Int32[]");
        assert_eq!(name(&array(3, Vec::new()), &context), "System.Int32[,,]");
        assert_eq!(
            name(
                &array(
                    1,
                    vec![ArrayDimensions {
                        size: Some(3),
                        lower_bound: Some(-1)
                    }]
                ),
                &context
            ),
            "System.Int32[-1...1]"
        );
    }

    #[test]
    fn methods() {
        // instance void M(int32, List`1<!0>&)
        let signature =
            parse_method_signature(&[0x20, 0x02, 0x01, 0x08, 0x10, 0x15, 0x12, 0x05, 0x01, 0x13, 0x00])
                .unwrap();
        let context = GenericContext {
            type_owner: Some(OWNER_TYPE),
            method_owner: Some(OWNER_METHOD),
        };

        assert_eq!(
            format_method(&lookup(), "Ns.Outer/Inner", "M", &signature, &context).unwrap(),
            "System.Void Ns.Outer/Inner::M(System.Int32,System.Collections.Generic.List`1<T>&)"
        );

        // method System.Int32 *(System.String)
        let fnptr = parse_method_signature(&[0x00, 0x01, 0x1B, 0x00, 0x01, 0x08, 0x0E, 0x01])
            .unwrap();
        assert_eq!(
            format_method(&lookup(), "C", "Call", &fnptr, &GenericContext::default()).unwrap(),
            "method System.Int32 *(System.String) C::Call(System.Void)"
        );

        // vararg void M(int32, ..., string)
        let vararg = parse_method_signature(&[0x05, 0x02, 0x01, 0x08, 0x41, 0x0E]).unwrap();
        assert_eq!(
            format_method(&lookup(), "C", "V", &vararg, &GenericContext::default()).unwrap(),
            "System.Void C::V(System.Int32,...,System.String)"
        );
    }

    #[test]
    fn unresolved_token_fails() {
        let signature = TypeSignature::Class(Token::new(0x0100_0009));
        assert!(format_type(&lookup(), &signature, &GenericContext::default(), 0).is_err());
    }
}
