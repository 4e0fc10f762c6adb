//! Table identifiers of the `#~` stream.

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// Identifiers of the metadata tables, including the Portable PDB tables (ECMA-335 II.22 and the
/// Portable PDB v1.0 format).
///
/// The discriminant is the table number, which is also the bit index in the `valid` mask of the
/// `#~` stream and the high byte of a token.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum TableId {
    Module = 0x00,
    TypeRef = 0x01,
    TypeDef = 0x02,
    FieldPtr = 0x03,
    Field = 0x04,
    MethodPtr = 0x05,
    MethodDef = 0x06,
    ParamPtr = 0x07,
    Param = 0x08,
    InterfaceImpl = 0x09,
    MemberRef = 0x0A,
    Constant = 0x0B,
    CustomAttribute = 0x0C,
    FieldMarshal = 0x0D,
    DeclSecurity = 0x0E,
    ClassLayout = 0x0F,
    FieldLayout = 0x10,
    StandAloneSig = 0x11,
    EventMap = 0x12,
    EventPtr = 0x13,
    Event = 0x14,
    PropertyMap = 0x15,
    PropertyPtr = 0x16,
    Property = 0x17,
    MethodSemantics = 0x18,
    MethodImpl = 0x19,
    ModuleRef = 0x1A,
    TypeSpec = 0x1B,
    ImplMap = 0x1C,
    FieldRVA = 0x1D,
    EncLog = 0x1E,
    EncMap = 0x1F,
    Assembly = 0x20,
    AssemblyProcessor = 0x21,
    AssemblyOS = 0x22,
    AssemblyRef = 0x23,
    AssemblyRefProcessor = 0x24,
    AssemblyRefOS = 0x25,
    File = 0x26,
    ExportedType = 0x27,
    ManifestResource = 0x28,
    NestedClass = 0x29,
    GenericParam = 0x2A,
    MethodSpec = 0x2B,
    GenericParamConstraint = 0x2C,
    Document = 0x30,
    MethodDebugInformation = 0x31,
    LocalScope = 0x32,
    LocalVariable = 0x33,
    LocalConstant = 0x34,
    ImportScope = 0x35,
    StateMachineMethod = 0x36,
    CustomDebugInformation = 0x37,
}

impl TableId {
    /// Bit mask with one bit set for every known table
    #[must_use]
    pub fn known_mask() -> u64 {
        TableId::iter().fold(0, |mask, id| mask | (1 << id as u64))
    }

    /// Returns true for the tables describing the type system, which a Portable PDB may
    /// reference but never contains
    #[must_use]
    pub fn is_type_system(self) -> bool {
        (self as u8) < 0x30
    }
}

impl TryFrom<u8> for TableId {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TableId::iter()
            .find(|id| *id as u8 == value)
            .ok_or_else(|| malformed_error!("Unknown table id - 0x{:02x}", value))
    }
}
