//! Column layout of every metadata table.
//!
//! Only a handful of tables are decoded into rows, but the size of every present table has to
//! be known to locate the ones that follow it in the `#~` stream.

use crate::metadata::tables::{CodedIndexType, TableId};

/// The kind of a single table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// A constant of the given byte width
    Fixed(u8),
    /// Index into the `#Strings` heap
    Str,
    /// Index into the `#GUID` heap
    Guid,
    /// Index into the `#Blob` heap
    Blob,
    /// Simple index into another table
    Table(TableId),
    /// Coded index into one of several tables
    Coded(CodedIndexType),
}

use CodedIndexType as C;
use Column::{Blob, Coded, Fixed, Guid, Str, Table};
use TableId as T;

/// The columns of `table`, in storage order
#[must_use]
pub fn columns(table: TableId) -> &'static [Column] {
    match table {
        T::Module => &[Fixed(2), Str, Guid, Guid, Guid],
        T::TypeRef => &[Coded(C::ResolutionScope), Str, Str],
        T::TypeDef => &[
            Fixed(4),
            Str,
            Str,
            Coded(C::TypeDefOrRef),
            Table(T::Field),
            Table(T::MethodDef),
        ],
        T::FieldPtr => &[Table(T::Field)],
        T::Field => &[Fixed(2), Str, Blob],
        T::MethodPtr => &[Table(T::MethodDef)],
        T::MethodDef => &[Fixed(4), Fixed(2), Fixed(2), Str, Blob, Table(T::Param)],
        T::ParamPtr => &[Table(T::Param)],
        T::Param => &[Fixed(2), Fixed(2), Str],
        T::InterfaceImpl => &[Table(T::TypeDef), Coded(C::TypeDefOrRef)],
        T::MemberRef => &[Coded(C::MemberRefParent), Str, Blob],
        T::Constant => &[Fixed(2), Coded(C::HasConstant), Blob],
        T::CustomAttribute => &[
            Coded(C::HasCustomAttribute),
            Coded(C::CustomAttributeType),
            Blob,
        ],
        T::FieldMarshal => &[Coded(C::HasFieldMarshal), Blob],
        T::DeclSecurity => &[Fixed(2), Coded(C::HasDeclSecurity), Blob],
        T::ClassLayout => &[Fixed(2), Fixed(4), Table(T::TypeDef)],
        T::FieldLayout => &[Fixed(4), Table(T::Field)],
        T::StandAloneSig | T::TypeSpec => &[Blob],
        T::EventMap => &[Table(T::TypeDef), Table(T::Event)],
        T::EventPtr => &[Table(T::Event)],
        T::Event => &[Fixed(2), Str, Coded(C::TypeDefOrRef)],
        T::PropertyMap => &[Table(T::TypeDef), Table(T::Property)],
        T::PropertyPtr => &[Table(T::Property)],
        T::Property => &[Fixed(2), Str, Blob],
        T::MethodSemantics => &[Fixed(2), Table(T::MethodDef), Coded(C::HasSemantics)],
        T::MethodImpl => &[
            Table(T::TypeDef),
            Coded(C::MethodDefOrRef),
            Coded(C::MethodDefOrRef),
        ],
        T::ModuleRef => &[Str],
        T::ImplMap => &[
            Fixed(2),
            Coded(C::MemberForwarded),
            Str,
            Table(T::ModuleRef),
        ],
        T::FieldRVA => &[Fixed(4), Table(T::Field)],
        T::EncLog => &[Fixed(4), Fixed(4)],
        T::EncMap => &[Fixed(4)],
        T::Assembly => &[
            Fixed(4),
            Fixed(2),
            Fixed(2),
            Fixed(2),
            Fixed(2),
            Fixed(4),
            Blob,
            Str,
            Str,
        ],
        T::AssemblyProcessor => &[Fixed(4)],
        T::AssemblyOS => &[Fixed(4), Fixed(4), Fixed(4)],
        T::AssemblyRef => &[
            Fixed(2),
            Fixed(2),
            Fixed(2),
            Fixed(2),
            Fixed(4),
            Blob,
            Str,
            Str,
            Blob,
        ],
        T::AssemblyRefProcessor => &[Fixed(4), Table(T::AssemblyRef)],
        T::AssemblyRefOS => &[Fixed(4), Fixed(4), Fixed(4), Table(T::AssemblyRef)],
        T::File => &[Fixed(4), Str, Blob],
        T::ExportedType => &[Fixed(4), Fixed(4), Str, Str, Coded(C::Implementation)],
        T::ManifestResource => &[Fixed(4), Fixed(4), Str, Coded(C::Implementation)],
        T::NestedClass => &[Table(T::TypeDef), Table(T::TypeDef)],
        T::GenericParam => &[Fixed(2), Fixed(2), Coded(C::TypeOrMethodDef), Str],
        T::MethodSpec => &[Coded(C::MethodDefOrRef), Blob],
        T::GenericParamConstraint => &[Table(T::GenericParam), Coded(C::TypeDefOrRef)],
        T::Document => &[Blob, Guid, Blob, Guid],
        T::MethodDebugInformation => &[Table(T::Document), Blob],
        T::LocalScope => &[
            Table(T::MethodDef),
            Table(T::ImportScope),
            Table(T::LocalVariable),
            Table(T::LocalConstant),
            Fixed(4),
            Fixed(4),
        ],
        T::LocalVariable => &[Fixed(2), Fixed(2), Str],
        T::LocalConstant => &[Str, Blob],
        T::ImportScope => &[Table(T::ImportScope), Blob],
        T::StateMachineMethod => &[Table(T::MethodDef), Table(T::MethodDef)],
        T::CustomDebugInformation => &[Coded(C::HasCustomDebugInformation), Guid, Blob],
    }
}
