//! Kind discriminants shared across the model.

use std::fmt;

use bitflags::bitflags;
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// What kind of model a node in the graph is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Source,
    Namespace,
    UsingStatement,
    Container,
    Member,
    Enum,
    EnumValue,
    Delegate,
    Attribute,
    AttributeParameter,
    Parameter,
    GenericParameter,
    Type,
    Unknown,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Source => "source",
            ModelKind::Namespace => "namespace",
            ModelKind::UsingStatement => "using",
            ModelKind::Container => "container",
            ModelKind::Member => "member",
            ModelKind::Enum => "enum",
            ModelKind::EnumValue => "enum value",
            ModelKind::Delegate => "delegate",
            ModelKind::Attribute => "attribute",
            ModelKind::AttributeParameter => "attribute parameter",
            ModelKind::Parameter => "parameter",
            ModelKind::GenericParameter => "generic parameter",
            ModelKind::Type => "type",
            ModelKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of container (a model that owns members).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Class,
    Interface,
    Structure,
    Record,
    RecordStructure,
}

impl ContainerKind {
    /// The declaration keyword for this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            ContainerKind::Class => "class",
            ContainerKind::Interface => "interface",
            ContainerKind::Structure => "struct",
            ContainerKind::Record => "record",
            ContainerKind::RecordStructure => "record struct",
        }
    }

    /// Whether instances of this kind are value types.
    pub fn is_value_type(&self) -> bool {
        matches!(self, ContainerKind::Structure | ContainerKind::RecordStructure)
    }

    /// Whether this kind can be checked for unimplemented interface members.
    pub fn implements_interfaces(&self) -> bool {
        matches!(self, ContainerKind::Class | ContainerKind::Structure)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Kind of member owned by a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Property,
    Method,
    Event,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Field => "field",
            MemberKind::Property => "property",
            MemberKind::Method => "method",
            MemberKind::Event => "event",
        }
    }

    /// Stable discriminant folded into signature hashes.
    pub(crate) fn discriminant(&self) -> u8 {
        match self {
            MemberKind::Field => 1,
            MemberKind::Property => 2,
            MemberKind::Method => 3,
            MemberKind::Event => 4,
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role a method plays within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    #[default]
    Member,
    Constructor,
    Destructor,
    /// Property getter.
    Get,
    /// Property setter.
    Set,
    /// Event add accessor.
    Add,
    /// Event remove accessor.
    Remove,
    /// Event raise accessor.
    Raise,
    /// Delegate invoke method.
    Invoke,
    Local,
    PartialDefinition,
    PartialImplementation,
}

impl MethodKind {
    /// Whether this method is an accessor of a property or event.
    pub fn is_accessor(&self) -> bool {
        matches!(
            self,
            MethodKind::Get
                | MethodKind::Set
                | MethodKind::Add
                | MethodKind::Remove
                | MethodKind::Raise
        )
    }
}

/// Declared accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Security {
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    PrivateProtected,
    Private,
    /// No accessibility was declared.
    #[default]
    Unknown,
}

impl Security {
    /// Source keyword(s) for this accessibility, empty when undeclared.
    pub fn keyword(&self) -> &'static str {
        match self {
            Security::Public => "public",
            Security::Protected => "protected",
            Security::Internal => "internal",
            Security::ProtectedInternal => "protected internal",
            Security::PrivateProtected => "private protected",
            Security::Private => "private",
            Security::Unknown => "",
        }
    }

    pub(crate) fn discriminant(&self) -> u8 {
        match self {
            Security::Public => 1,
            Security::Protected => 2,
            Security::Internal => 3,
            Security::ProtectedInternal => 4,
            Security::PrivateProtected => 5,
            Security::Private => 6,
            Security::Unknown => 0,
        }
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl std::str::FromStr for Security {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "public" => Ok(Security::Public),
            "protected" => Ok(Security::Protected),
            "internal" => Ok(Security::Internal),
            "protected internal" => Ok(Security::ProtectedInternal),
            "private protected" => Ok(Security::PrivateProtected),
            "private" => Ok(Security::Private),
            "" | "unknown" => Ok(Security::Unknown),
            _ => Err(format!("unknown accessibility: {}", s)),
        }
    }
}

/// Kind of a model nested inside a class or structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedKind {
    Class,
    Interface,
    Structure,
    Record,
    RecordStructure,
    Enum,
    Delegate,
}

impl From<ContainerKind> for NestedKind {
    fn from(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Class => NestedKind::Class,
            ContainerKind::Interface => NestedKind::Interface,
            ContainerKind::Structure => NestedKind::Structure,
            ContainerKind::Record => NestedKind::Record,
            ContainerKind::RecordStructure => NestedKind::RecordStructure,
        }
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Keywords: u16 {
        const ABSTRACT = 1 << 0;
        const ASYNC = 1 << 1;
        const CONST = 1 << 2;
        const EXTERN = 1 << 3;
        const NEW = 1 << 4;
        const OVERRIDE = 1 << 5;
        const PARTIAL = 1 << 6;
        const READONLY = 1 << 7;
        const SEALED = 1 << 8;
        const STATIC = 1 << 9;
        const UNSAFE = 1 << 10;
        const VIRTUAL = 1 << 11;
        const VOLATILE = 1 << 12;
        const REQUIRED = 1 << 13;
    }
}

/// Keyword spellings in declaration order.
const KEYWORD_ORDER: &[(Keywords, &str)] = &[
    (Keywords::NEW, "new"),
    (Keywords::STATIC, "static"),
    (Keywords::CONST, "const"),
    (Keywords::EXTERN, "extern"),
    (Keywords::ABSTRACT, "abstract"),
    (Keywords::VIRTUAL, "virtual"),
    (Keywords::OVERRIDE, "override"),
    (Keywords::SEALED, "sealed"),
    (Keywords::READONLY, "readonly"),
    (Keywords::VOLATILE, "volatile"),
    (Keywords::UNSAFE, "unsafe"),
    (Keywords::REQUIRED, "required"),
    (Keywords::ASYNC, "async"),
    (Keywords::PARTIAL, "partial"),
];

impl Keywords {
    /// Parse a single modifier keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        let word = word.trim();
        KEYWORD_ORDER
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(word))
            .map(|(flag, _)| *flag)
    }

    /// Modifier keywords that are set, in declaration order.
    pub fn keyword_names(&self) -> Vec<&'static str> {
        KEYWORD_ORDER
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

/// Built-in types the language gives special meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellKnownType {
    Object,
    String,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    DateTime,
    Void,
    Dynamic,
    IntPtr,
    UIntPtr,
}

/// Keyword aliases and framework names for well-known types.
static WELL_KNOWN_TYPES: phf::Map<&'static str, WellKnownType> = phf_map! {
    "object" => WellKnownType::Object,
    "Object" => WellKnownType::Object,
    "string" => WellKnownType::String,
    "String" => WellKnownType::String,
    "bool" => WellKnownType::Boolean,
    "Boolean" => WellKnownType::Boolean,
    "char" => WellKnownType::Char,
    "Char" => WellKnownType::Char,
    "sbyte" => WellKnownType::SByte,
    "SByte" => WellKnownType::SByte,
    "byte" => WellKnownType::Byte,
    "Byte" => WellKnownType::Byte,
    "short" => WellKnownType::Int16,
    "Int16" => WellKnownType::Int16,
    "ushort" => WellKnownType::UInt16,
    "UInt16" => WellKnownType::UInt16,
    "int" => WellKnownType::Int32,
    "Int32" => WellKnownType::Int32,
    "uint" => WellKnownType::UInt32,
    "UInt32" => WellKnownType::UInt32,
    "long" => WellKnownType::Int64,
    "Int64" => WellKnownType::Int64,
    "ulong" => WellKnownType::UInt64,
    "UInt64" => WellKnownType::UInt64,
    "float" => WellKnownType::Single,
    "Single" => WellKnownType::Single,
    "double" => WellKnownType::Double,
    "Double" => WellKnownType::Double,
    "decimal" => WellKnownType::Decimal,
    "Decimal" => WellKnownType::Decimal,
    "DateTime" => WellKnownType::DateTime,
    "void" => WellKnownType::Void,
    "Void" => WellKnownType::Void,
    "dynamic" => WellKnownType::Dynamic,
    "nint" => WellKnownType::IntPtr,
    "IntPtr" => WellKnownType::IntPtr,
    "nuint" => WellKnownType::UIntPtr,
    "UIntPtr" => WellKnownType::UIntPtr,
};

impl WellKnownType {
    /// Look up a well-known type by keyword alias or framework name.
    ///
    /// A `System.` prefix is accepted on framework names.
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.strip_prefix("System.").unwrap_or(name);
        WELL_KNOWN_TYPES.get(name).copied()
    }

    /// The keyword alias used in declarations.
    pub fn keyword(&self) -> &'static str {
        match self {
            WellKnownType::Object => "object",
            WellKnownType::String => "string",
            WellKnownType::Boolean => "bool",
            WellKnownType::Char => "char",
            WellKnownType::SByte => "sbyte",
            WellKnownType::Byte => "byte",
            WellKnownType::Int16 => "short",
            WellKnownType::UInt16 => "ushort",
            WellKnownType::Int32 => "int",
            WellKnownType::UInt32 => "uint",
            WellKnownType::Int64 => "long",
            WellKnownType::UInt64 => "ulong",
            WellKnownType::Single => "float",
            WellKnownType::Double => "double",
            WellKnownType::Decimal => "decimal",
            WellKnownType::DateTime => "DateTime",
            WellKnownType::Void => "void",
            WellKnownType::Dynamic => "dynamic",
            WellKnownType::IntPtr => "nint",
            WellKnownType::UIntPtr => "nuint",
        }
    }

    /// The framework type name (without namespace).
    pub fn framework_name(&self) -> &'static str {
        match self {
            WellKnownType::Object => "Object",
            WellKnownType::String => "String",
            WellKnownType::Boolean => "Boolean",
            WellKnownType::Char => "Char",
            WellKnownType::SByte => "SByte",
            WellKnownType::Byte => "Byte",
            WellKnownType::Int16 => "Int16",
            WellKnownType::UInt16 => "UInt16",
            WellKnownType::Int32 => "Int32",
            WellKnownType::UInt32 => "UInt32",
            WellKnownType::Int64 => "Int64",
            WellKnownType::UInt64 => "UInt64",
            WellKnownType::Single => "Single",
            WellKnownType::Double => "Double",
            WellKnownType::Decimal => "Decimal",
            WellKnownType::DateTime => "DateTime",
            WellKnownType::Void => "Void",
            WellKnownType::Dynamic => "Object",
            WellKnownType::IntPtr => "IntPtr",
            WellKnownType::UIntPtr => "UIntPtr",
        }
    }

    /// Whether values of this type are value types.
    pub fn is_value_type(&self) -> bool {
        !matches!(
            self,
            WellKnownType::Object
                | WellKnownType::String
                | WellKnownType::Dynamic
                | WellKnownType::Void
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_from_str() {
        assert_eq!("public".parse::<Security>().unwrap(), Security::Public);
        assert_eq!(
            "protected_internal".parse::<Security>().unwrap(),
            Security::ProtectedInternal
        );
        assert_eq!("".parse::<Security>().unwrap(), Security::Unknown);
        assert!("friend".parse::<Security>().is_err());
    }

    #[test]
    fn test_keywords_round_trip_names() {
        let kw = Keywords::from_keyword("override").unwrap() | Keywords::SEALED;
        assert_eq!(kw.keyword_names(), vec!["override", "sealed"]);
        assert!(Keywords::from_keyword("friend").is_none());
    }

    #[test]
    fn test_well_known_lookup() {
        assert_eq!(WellKnownType::lookup("int"), Some(WellKnownType::Int32));
        assert_eq!(WellKnownType::lookup("System.Int32"), Some(WellKnownType::Int32));
        assert_eq!(WellKnownType::lookup("Widget"), None);
        assert!(WellKnownType::Int32.is_value_type());
        assert!(!WellKnownType::String.is_value_type());
    }

    #[test]
    fn test_container_kind_implements_interfaces() {
        assert!(ContainerKind::Class.implements_interfaces());
        assert!(ContainerKind::Structure.implements_interfaces());
        assert!(!ContainerKind::Interface.implements_interfaces());
        assert!(!ContainerKind::Record.implements_interfaces());
    }
}
