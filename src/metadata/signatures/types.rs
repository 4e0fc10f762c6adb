//! Decoded signature structures (ECMA-335 II.23.2).

use crate::metadata::token::Token;

#[allow(non_snake_case, dead_code, missing_docs)]
/// Possible bytes that represent various 'Types' for a signature - from coreclr
pub mod ELEMENT_TYPE {
    //Marks end of a list
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0a;
    pub const U8: u8 = 0x0b;
    pub const R4: u8 = 0x0c;
    pub const R8: u8 = 0x0d;
    pub const STRING: u8 = 0x0e;
    // Followed by type
    pub const PTR: u8 = 0x0f;
    // Followed by type
    pub const BYREF: u8 = 0x10;
    // Followed by TypeDef or TypeRef token
    pub const VALUETYPE: u8 = 0x11;
    // Followed by TypeDef or TypeRef token
    pub const CLASS: u8 = 0x12;
    // Generic parameter in a generic type definition, represented as number
    pub const VAR: u8 = 0x13;
    // type rank boundsCount bound1 … loCount lo1 …
    pub const ARRAY: u8 = 0x14;
    // Generic type instantiation. Followed by type type-arg-count type-1 ... type-n
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    // System.IntPtr
    pub const I: u8 = 0x18;
    // System.UIntPtr
    pub const U: u8 = 0x19;
    // Followed by full method signature
    pub const FNPTR: u8 = 0x1b;
    // System.Object
    pub const OBJECT: u8 = 0x1c;
    // Single-dim array with 0 lower bound
    pub const SZARRAY: u8 = 0x1d;
    // Generic parameter in a generic method definition,represented as number
    pub const MVAR: u8 = 0x1e;
    // Required modifier : followed by a TypeDef or TypeRef token
    pub const CMOD_REQD: u8 = 0x1f;
    // Optional modifier : followed by a TypeDef or TypeRef token
    pub const CMOD_OPT: u8 = 0x20;
    // Implemented within the CLI
    pub const INTERNAL: u8 = 0x21;
    // Or’d with following element types
    pub const MODIFIER: u8 = 0x40;
    // Sentinel for vararg method signature
    pub const SENTINEL: u8 = 0x41;
    // Denotes a local variable that points at a pinned object
    pub const PINNED: u8 = 0x45;
}

/// Calling convention bits of a method signature
#[allow(non_snake_case, dead_code, missing_docs)]
pub mod CALLING_CONVENTION {
    pub const DEFAULT: u8 = 0x00;
    pub const VARARG: u8 = 0x05;
    pub const KIND_MASK: u8 = 0x0F;
    pub const GENERIC: u8 = 0x10;
    pub const HASTHIS: u8 = 0x20;
    pub const EXPLICITTHIS: u8 = 0x40;
}

/// A single dimension of a general array
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayDimensions {
    /// The size of this dimension
    pub size: Option<u32>,
    /// The lower bound of this dimension, may be negative
    pub lower_bound: Option<i32>,
}

/// A general (multi-dimensional or non-zero based) array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureArray {
    /// Element type
    pub base: Box<TypeSignature>,
    /// Number of dimensions
    pub rank: u32,
    /// Dimensions with size or lower bound information, at most `rank` entries
    pub dimensions: Vec<ArrayDimensions>,
}

/// A type as it appears inside a signature blob
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Void,
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    String,
    I,
    U,
    Object,
    TypedByRef,
    /// Unmanaged pointer to the inner type
    Ptr(Box<TypeSignature>),
    /// Managed reference to the inner type
    ByRef(Box<TypeSignature>),
    /// Value type, `TypeDef`, `TypeRef` or `TypeSpec` token
    ValueType(Token),
    /// Reference type, `TypeDef`, `TypeRef` or `TypeSpec` token
    Class(Token),
    /// Generic parameter of the enclosing type, by position
    GenericParamType(u32),
    /// Generic parameter of the enclosing method, by position
    GenericParamMethod(u32),
    Array(SignatureArray),
    /// Single dimensional, zero based array
    SzArray(Box<TypeSignature>),
    /// Generic instantiation of the base type with the listed arguments
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    FnPtr(Box<SignatureMethod>),
    /// `modreq(modifier)` applied to the inner type
    ModifiedRequired(Token, Box<TypeSignature>),
    /// `modopt(modifier)` applied to the inner type
    ModifiedOptional(Token, Box<TypeSignature>),
    Pinned(Box<TypeSignature>),
    /// First of the variable arguments of a vararg call site
    Sentinel(Box<TypeSignature>),
}

/// A method signature (`MethodDefSig`, `MethodRefSig` or `StandAloneMethodSig`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMethod {
    /// Instance method, `this` is passed implicitly
    pub has_this: bool,
    /// `this` is part of the parameter list
    pub explicit_this: bool,
    /// Default managed calling convention
    pub default: bool,
    /// Variable argument calling convention
    pub vararg: bool,
    /// Raw calling convention kind (low nibble of the first byte)
    pub calling_convention: u8,
    /// Number of generic parameters of a generic method, 0 otherwise
    pub param_count_generic: u32,
    /// Return type
    pub return_type: TypeSignature,
    /// Parameter types, in declaration order
    pub params: Vec<TypeSignature>,
}

/// A `TypeSpec` signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureTypeSpec {
    /// The specified type
    pub base: TypeSignature,
}
