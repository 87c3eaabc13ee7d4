use std::fmt;

/// Errors that occur when constructing or validating schema types.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// Entity kind failed lower-case identifier validation.
    InvalidEntityKind(String),
    /// Column key failed attribute-name validation.
    InvalidColumnKey(String),
    /// Schema declares no columns.
    EmptyColumns,
    /// Two columns share the same key.
    DuplicateColumnKey(String),
    /// A select column was declared without options.
    MissingOptions(String),
    /// An option value was an empty string.
    EmptyOptionValue,
    /// Two options share the same value.
    DuplicateOption(String),
    /// A card section references a column the schema does not declare.
    UnknownCardField(String),
    /// The key accessor attribute is not a valid column key.
    InvalidKeyAttribute(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEntityKind(s) => {
                write!(
                    f,
                    "invalid entity kind '{s}': must be lower-case [a-z][a-z0-9_-]*"
                )
            }
            Self::InvalidColumnKey(s) => {
                write!(
                    f,
                    "invalid column key '{s}': must match [A-Za-z][A-Za-z0-9_]*"
                )
            }
            Self::EmptyColumns => write!(f, "schema must have at least one column"),
            Self::DuplicateColumnKey(k) => write!(f, "duplicate column key '{k}'"),
            Self::MissingOptions(k) => {
                write!(f, "select column '{k}' must declare at least one option")
            }
            Self::EmptyOptionValue => write!(f, "option value must not be an empty string"),
            Self::DuplicateOption(v) => write!(f, "duplicate option '{v}'"),
            Self::UnknownCardField(k) => {
                write!(f, "card section references unknown column '{k}'")
            }
            Self::InvalidKeyAttribute(k) => write!(f, "invalid key attribute '{k}'"),
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let cases = vec![
            (
                SchemaError::InvalidEntityKind("Pickups".into()),
                "invalid entity kind 'Pickups'",
            ),
            (
                SchemaError::InvalidColumnKey("1st".into()),
                "invalid column key '1st'",
            ),
            (SchemaError::EmptyColumns, "schema must have at least one column"),
            (
                SchemaError::DuplicateColumnKey("name".into()),
                "duplicate column key 'name'",
            ),
            (
                SchemaError::MissingOptions("status".into()),
                "select column 'status' must declare",
            ),
            (
                SchemaError::EmptyOptionValue,
                "option value must not be an empty string",
            ),
            (
                SchemaError::DuplicateOption("Draft".into()),
                "duplicate option 'Draft'",
            ),
            (
                SchemaError::UnknownCardField("wallet".into()),
                "card section references unknown column 'wallet'",
            ),
            (
                SchemaError::InvalidKeyAttribute("".into()),
                "invalid key attribute ''",
            ),
        ];

        for (error, expected_prefix) in cases {
            let msg = error.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error display for {error:?} = '{msg}', expected to start with '{expected_prefix}'"
            );
        }
    }

    #[test]
    fn error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(SchemaError::EmptyColumns);
        assert!(err.to_string().contains("at least one column"));
    }
}
