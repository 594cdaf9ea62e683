use std::fmt::Display;

/// The comparable type of a value. Surface types collapse onto these, so
/// `i8` and `u64` are the same sort; width and signedness are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalSort {
    Integer,
    Float,
    String,
    Bool,
}

impl Display for CanonicalSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
        };

        write!(f, "{name}")
    }
}

/// Maps a primitive type name or a literal-kind tag to its sort.
pub fn resolve(tag: &str) -> Option<CanonicalSort> {
    match tag {
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" => Some(CanonicalSort::Integer),
        "f32" | "f64" => Some(CanonicalSort::Float),
        "bool" => Some(CanonicalSort::Bool),
        "LitStr" => Some(CanonicalSort::String),
        "LitBool" => Some(CanonicalSort::Bool),
        "LitFloat" => Some(CanonicalSort::Float),
        "LitInteger" => Some(CanonicalSort::Integer),
        _ => None,
    }
}
