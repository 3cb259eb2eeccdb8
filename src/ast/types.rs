use std::fmt::Display;

/// The two value types of SPL. Storage is always numeric; booleans only
/// exist as the result of comparisons and logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Numeric,
    Boolean,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Numeric => write!(f, "numeric"),
            ValueType::Boolean => write!(f, "boolean"),
        }
    }
}
