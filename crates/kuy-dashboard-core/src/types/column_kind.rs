use serde::{Deserialize, Serialize};

use super::column_key::ColumnKey;

/// How a column is rendered and edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ColumnKind {
    Text,
    /// A date, optionally paired with a companion time attribute.
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_key: Option<ColumnKey>,
    },
    Status,
    Role,
    /// An image path or URL (banners, receipts, photos).
    Image,
    RichText,
    Select,
}

impl ColumnKind {
    /// A date column without a companion time attribute.
    pub fn date() -> Self {
        Self::Date { time_key: None }
    }

    /// A date column shown together with `time_key`.
    pub fn date_with_time(time_key: ColumnKey) -> Self {
        Self::Date {
            time_key: Some(time_key),
        }
    }

    /// Returns true for kinds whose input is constrained to declared options.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Status)
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Date { time_key: None } => write!(f, "date"),
            Self::Date {
                time_key: Some(time),
            } => write!(f, "date+{time}"),
            Self::Status => write!(f, "status"),
            Self::Role => write!(f, "role"),
            Self::Image => write!(f, "image"),
            Self::RichText => write!(f, "richtext"),
            Self::Select => write!(f, "select"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_simple_kinds() {
        assert_eq!(ColumnKind::Text.to_string(), "text");
        assert_eq!(ColumnKind::Status.to_string(), "status");
        assert_eq!(ColumnKind::RichText.to_string(), "richtext");
        assert_eq!(ColumnKind::date().to_string(), "date");
    }

    #[test]
    fn display_date_with_time() {
        let kind = ColumnKind::date_with_time(ColumnKey::new("time").unwrap());
        assert_eq!(kind.to_string(), "date+time");
    }

    #[test]
    fn choice_kinds() {
        assert!(ColumnKind::Select.is_choice());
        assert!(ColumnKind::Status.is_choice());
        assert!(!ColumnKind::Role.is_choice());
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&ColumnKind::Image).unwrap();
        assert_eq!(json, r#"{"type":"image"}"#);
        let back: ColumnKind =
            serde_json::from_str(r#"{"type":"date","data":{"time_key":"time"}}"#).unwrap();
        assert_eq!(
            back,
            ColumnKind::date_with_time(ColumnKey::new("time").unwrap())
        );
    }
}
