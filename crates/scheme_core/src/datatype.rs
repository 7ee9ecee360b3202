use std::fmt;

/// Closed set of types that can be inferred for a single value or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Zero-length input, carries no value.
    Empty,
    Boolean,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Exactly one character.
    Character,
    DateTime,
    String,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 11] = [
        TypeTag::Empty,
        TypeTag::Boolean,
        TypeTag::Byte,
        TypeTag::Short,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::Float32,
        TypeTag::Float64,
        TypeTag::Character,
        TypeTag::DateTime,
        TypeTag::String,
    ];

    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeTag::Byte
                | TypeTag::Short
                | TypeTag::Int32
                | TypeTag::Int64
                | TypeTag::Float32
                | TypeTag::Float64
        )
    }

    /// Position in the numeric widening order, `None` for non-numeric tags.
    ///
    /// Byte < Short < Int32 < Int64 < Float32 < Float64
    pub const fn numeric_rank(&self) -> Option<u8> {
        match self {
            TypeTag::Byte => Some(0),
            TypeTag::Short => Some(1),
            TypeTag::Int32 => Some(2),
            TypeTag::Int64 => Some(3),
            TypeTag::Float32 => Some(4),
            TypeTag::Float64 => Some(5),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Byte => write!(f, "Byte"),
            Self::Short => write!(f, "Short"),
            Self::Int32 => write!(f, "Int32"),
            Self::Int64 => write!(f, "Int64"),
            Self::Float32 => write!(f, "Float32"),
            Self::Float64 => write!(f, "Float64"),
            Self::Character => write!(f, "Character"),
            Self::DateTime => write!(f, "DateTime"),
            Self::String => write!(f, "String"),
        }
    }
}

/// A classified value: the inferred tag and the value's canonical text under
/// that tag.
///
/// `text` is only `None` for `TypeTag::Empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    pub tag: TypeTag,
    pub text: Option<String>,
}

impl TypedValue {
    pub const fn empty() -> Self {
        TypedValue {
            tag: TypeTag::Empty,
            text: None,
        }
    }

    pub fn new(tag: TypeTag, text: impl Into<String>) -> Self {
        TypedValue {
            tag,
            text: Some(text.into()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}({text:?})", self.tag),
            None => write!(f, "{}", self.tag),
        }
    }
}

/// Inferred name and type for a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub datatype: TypeTag,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, datatype: TypeTag) -> Self {
        ColumnSchema {
            name: name.into(),
            datatype,
        }
    }
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.datatype)
    }
}
