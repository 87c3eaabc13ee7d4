//! Cell rendering: one attribute of one entity to a display [`Cell`].
//!
//! Rendering is total. Every input, including missing attributes and values
//! of an unexpected JSON type, produces a cell.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{value_text, ColumnDescriptor, ColumnKind, Entity, EntityKind, EntitySchema};

/// Placeholder text for a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Badge text for a missing status.
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Maximum number of characters kept in a rich-text excerpt.
pub const EXCERPT_CHARS: usize = 150;

const INDONESIAN_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

// ---------------------------------------------------------------------------
// BadgeCategory
// ---------------------------------------------------------------------------

/// Visual classification of a status or role badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Success,
    Failure,
    Pending,
    Neutral,
    Highlighted,
}

impl fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Pending => write!(f, "pending"),
            Self::Neutral => write!(f, "neutral"),
            Self::Highlighted => write!(f, "highlighted"),
        }
    }
}

// ---------------------------------------------------------------------------
// StatusResolver
// ---------------------------------------------------------------------------

/// Maps a status string to its badge category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusResolver {
    /// `Berhasil`, `Gagal`, `Proses`, matched exactly.
    Transaction,
    /// `aktif` / `nonaktif`, matched case-insensitively.
    Account,
    /// Exact status → category pairs; anything else is neutral.
    Custom(Vec<(String, BadgeCategory)>),
}

impl StatusResolver {
    /// The default resolver for an entity kind.
    pub fn for_kind(kind: &EntityKind) -> Self {
        if kind.is_users() {
            Self::Account
        } else {
            Self::Transaction
        }
    }

    pub fn classify(&self, status: &str) -> BadgeCategory {
        match self {
            Self::Transaction => match status {
                "Berhasil" => BadgeCategory::Success,
                "Gagal" => BadgeCategory::Failure,
                "Proses" => BadgeCategory::Pending,
                _ => BadgeCategory::Neutral,
            },
            Self::Account => match status.to_lowercase().as_str() {
                "aktif" => BadgeCategory::Success,
                "nonaktif" => BadgeCategory::Failure,
                _ => BadgeCategory::Neutral,
            },
            Self::Custom(pairs) => pairs
                .iter()
                .find(|(s, _)| s == status)
                .map(|(_, c)| *c)
                .unwrap_or(BadgeCategory::Neutral),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A rendered attribute, ready for a display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    Text { text: String },
    Badge { text: String, category: BadgeCategory },
    /// A date with an optional companion time shown under it.
    DateTime { date: String, time: Option<String> },
    Image { url: String },
    NoImage,
    RichText { excerpt: String, full: String },
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn badge(text: impl Into<String>, category: BadgeCategory) -> Self {
        Self::Badge {
            text: text.into(),
            category,
        }
    }

    /// The `N/A` placeholder.
    pub fn not_available() -> Self {
        Self::text(NOT_AVAILABLE)
    }

    /// Plain-text form for surfaces without markup.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text { text } | Self::Badge { text, .. } => text.clone(),
            Self::DateTime { date, time: None } => date.clone(),
            Self::DateTime {
                date,
                time: Some(time),
            } => format!("{date} ({time})"),
            Self::Image { url } => url.clone(),
            Self::NoImage => "No image available".to_string(),
            Self::RichText { excerpt, .. } => excerpt.clone(),
        }
    }

    /// The image URL, for cells that carry one.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { url } => Some(url),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

// ---------------------------------------------------------------------------
// RenderContext
// ---------------------------------------------------------------------------

/// Inputs the renderer needs beyond the column and the entity.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Prefix for relative image paths, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Resolved image URLs keyed by stored value, consulted first.
    pub image_urls: HashMap<String, String>,
    pub status_resolver: StatusResolver,
}

impl RenderContext {
    pub fn new(base_url: impl Into<String>, status_resolver: StatusResolver) -> Self {
        Self {
            base_url: base_url.into(),
            image_urls: HashMap::new(),
            status_resolver,
        }
    }

    /// A context using the schema's own status resolver.
    pub fn for_schema(schema: &EntitySchema, base_url: impl Into<String>) -> Self {
        Self::new(base_url, schema.status_resolver.clone())
    }

    pub fn with_image_url(mut self, stored: impl Into<String>, url: impl Into<String>) -> Self {
        self.image_urls.insert(stored.into(), url.into());
        self
    }

    fn resolve_image(&self, stored: &str) -> String {
        if let Some(url) = self.image_urls.get(stored) {
            return url.clone();
        }
        if is_absolute_url(stored) || self.base_url.is_empty() {
            return stored.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            stored.trim_start_matches('/')
        )
    }
}

fn is_absolute_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("data:")
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

/// Renders `column` of `entity`.
///
/// A render override on the column wins; otherwise the column kind decides.
pub fn render(column: &ColumnDescriptor, entity: &Entity, ctx: &RenderContext) -> Cell {
    let value = entity.get_or_null(column.key.as_str());
    if let Some(custom) = &column.render {
        return custom.call(value, entity);
    }

    match &column.kind {
        ColumnKind::Status => match non_empty_text(value) {
            Some(status) => {
                let category = ctx.status_resolver.classify(&status);
                Cell::badge(status, category)
            }
            None => Cell::badge(UNKNOWN_STATUS, BadgeCategory::Neutral),
        },
        ColumnKind::Role => match value_text(value) {
            Some(role) if role.eq_ignore_ascii_case("admin") => {
                Cell::badge(&*role, BadgeCategory::Highlighted)
            }
            Some(role) => Cell::badge(&*role, BadgeCategory::Neutral),
            None => Cell::badge(NOT_AVAILABLE, BadgeCategory::Neutral),
        },
        ColumnKind::Image => match value {
            Value::String(s) if !s.trim().is_empty() => Cell::Image {
                url: ctx.resolve_image(s.trim()),
            },
            _ => Cell::NoImage,
        },
        ColumnKind::Date { time_key } => {
            let Some(date) = non_empty_text(value) else {
                return Cell::not_available();
            };
            let time = time_key
                .as_ref()
                .and_then(|k| non_empty_text(entity.get_or_null(k.as_str())));
            Cell::DateTime {
                date: format_date(&date),
                time,
            }
        }
        ColumnKind::RichText => match non_empty_text(value) {
            Some(html) => {
                let full = strip_tags(&html);
                Cell::RichText {
                    excerpt: excerpt(&full, EXCERPT_CHARS),
                    full,
                }
            }
            None => Cell::not_available(),
        },
        ColumnKind::Select => match non_empty_text(value) {
            Some(raw) => Cell::text(column.options.label_for(&raw).unwrap_or(&raw)),
            None => Cell::not_available(),
        },
        ColumnKind::Text => non_empty_text(value)
            .map(Cell::text)
            .unwrap_or_else(Cell::not_available),
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    value_text(value)
        .filter(|s| !s.is_empty())
        .map(|s| s.into_owned())
}

/// Formats ISO dates and RFC 3339 timestamps in the Indonesian long form
/// (`27 Oktober 2024`); any other string is returned unchanged.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw.trim()) {
        Some(d) => format!(
            "{} {} {}",
            d.day(),
            INDONESIAN_MONTHS[d.month0() as usize],
            d.year()
        ),
        None => raw.to_string(),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Removes markup and collapses whitespace runs to single spaces.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                // block boundaries separate words
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `max` characters of `text`, with `...` appended when cut.
pub fn excerpt(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnKey, SelectOptions};
    use serde_json::json;

    fn key(s: &str) -> ColumnKey {
        ColumnKey::new(s).unwrap()
    }

    fn entity(v: Value) -> Entity {
        Entity::from_value(v).unwrap()
    }

    fn ctx() -> RenderContext {
        RenderContext::new("http://localhost:5000", StatusResolver::Transaction)
    }

    fn status_col() -> ColumnDescriptor {
        ColumnDescriptor::new(key("status"), "Status", ColumnKind::Status)
    }

    #[test]
    fn transaction_statuses() {
        let cases = [
            ("Berhasil", BadgeCategory::Success),
            ("Gagal", BadgeCategory::Failure),
            ("Proses", BadgeCategory::Pending),
            ("Nonexistent", BadgeCategory::Neutral),
            ("berhasil", BadgeCategory::Neutral),
        ];
        for (status, category) in cases {
            let cell = render(&status_col(), &entity(json!({ "status": status })), &ctx());
            assert_eq!(cell, Cell::badge(status, category), "status {status}");
        }
    }

    #[test]
    fn account_statuses_ignore_case() {
        let ctx = RenderContext::new("", StatusResolver::Account);
        let aktif = render(&status_col(), &entity(json!({"status": "Aktif"})), &ctx);
        let non = render(&status_col(), &entity(json!({"status": "NONAKTIF"})), &ctx);
        assert_eq!(aktif, Cell::badge("Aktif", BadgeCategory::Success));
        assert_eq!(non, Cell::badge("NONAKTIF", BadgeCategory::Failure));
    }

    #[test]
    fn custom_resolver() {
        let resolver =
            StatusResolver::Custom(vec![("Dipublikasikan".into(), BadgeCategory::Success)]);
        assert_eq!(resolver.classify("Dipublikasikan"), BadgeCategory::Success);
        assert_eq!(resolver.classify("Draft"), BadgeCategory::Neutral);
    }

    #[test]
    fn missing_status_is_unknown() {
        let unknown = Cell::badge("Unknown", BadgeCategory::Neutral);
        for v in [json!({}), json!({"status": null}), json!({"status": ""})] {
            assert_eq!(render(&status_col(), &entity(v), &ctx()), unknown);
        }
    }

    #[test]
    fn admin_role_is_highlighted() {
        let col = ColumnDescriptor::new(key("role"), "Role", ColumnKind::Role);
        let admin = render(&col, &entity(json!({"role": "ADMIN"})), &ctx());
        let user = render(&col, &entity(json!({"role": "User"})), &ctx());
        let missing = render(&col, &entity(json!({})), &ctx());
        assert_eq!(admin, Cell::badge("ADMIN", BadgeCategory::Highlighted));
        assert_eq!(user, Cell::badge("User", BadgeCategory::Neutral));
        assert_eq!(missing, Cell::badge("N/A", BadgeCategory::Neutral));
    }

    #[test]
    fn missing_text_is_not_available() {
        let col = ColumnDescriptor::text(key("email"), "Email");
        assert_eq!(render(&col, &entity(json!({})), &ctx()), Cell::text("N/A"));
        assert_eq!(render(&col, &entity(json!({"email": ""})), &ctx()), Cell::text("N/A"));
        assert_eq!(render(&col, &entity(json!({"email": 0})), &ctx()), Cell::text("0"));
    }

    #[test]
    fn images_resolve_against_base_url() {
        let col = ColumnDescriptor::new(key("banner"), "Banner", ColumnKind::Image);
        let cases = [
            ("/uploads/a.png", "http://localhost:5000/uploads/a.png"),
            ("uploads/a.png", "http://localhost:5000/uploads/a.png"),
            ("https://cdn.example/a.png", "https://cdn.example/a.png"),
        ];
        for (stored, url) in cases {
            let cell = render(&col, &entity(json!({ "banner": stored })), &ctx());
            assert_eq!(cell, Cell::Image { url: url.into() });
        }
    }

    #[test]
    fn image_url_map_wins() {
        let col = ColumnDescriptor::new(key("banner"), "Banner", ColumnKind::Image);
        let ctx = ctx().with_image_url("a.png", "blob:preview-1");
        let cell = render(&col, &entity(json!({"banner": "a.png"})), &ctx);
        assert_eq!(cell.image_url(), Some("blob:preview-1"));
    }

    #[test]
    fn missing_image_is_no_image() {
        let col = ColumnDescriptor::new(key("banner"), "Banner", ColumnKind::Image);
        for v in [json!({}), json!({"banner": ""}), json!({"banner": 3})] {
            assert_eq!(render(&col, &entity(v), &ctx()), Cell::NoImage);
        }
    }

    #[test]
    fn dates_render_with_companion_time() {
        let col = ColumnDescriptor::new(
            key("date"),
            "Tanggal & Jam",
            ColumnKind::date_with_time(key("time")),
        );
        let cell = render(
            &col,
            &entity(json!({"date": "Oct 27, 2024", "time": "08:00"})),
            &ctx(),
        );
        assert_eq!(cell.display_text(), "Oct 27, 2024 (08:00)");

        let iso = render(&col, &entity(json!({"date": "2024-10-27"})), &ctx());
        assert_eq!(
            iso,
            Cell::DateTime {
                date: "27 Oktober 2024".into(),
                time: None
            }
        );
        assert_eq!(render(&col, &entity(json!({})), &ctx()), Cell::not_available());
    }

    #[test]
    fn format_date_variants() {
        assert_eq!(format_date("2024-01-05T10:00:00.000Z"), "5 Januari 2024");
        assert_eq!(format_date("2024-12-31T23:00:00"), "31 Desember 2024");
        assert_eq!(format_date("kemarin"), "kemarin");
    }

    #[test]
    fn rich_text_excerpt() {
        let col = ColumnDescriptor::new(key("isiBlog"), "Isi Blog", ColumnKind::RichText);
        let long = format!("<p>{}</p>", "a".repeat(200));
        let Cell::RichText { excerpt, full } =
            render(&col, &entity(json!({"isiBlog": long})), &ctx())
        else {
            panic!("expected rich text");
        };
        assert_eq!(full.len(), 200);
        assert_eq!(excerpt.chars().count(), 153);
        assert!(excerpt.ends_with("..."));

        let short = render(
            &col,
            &entity(json!({"isiBlog": "<h1>Daur</h1><p>ulang&amp;go</p>"})),
            &ctx(),
        );
        assert_eq!(short.display_text(), "Daur ulang&go");
    }

    #[test]
    fn excerpt_counts_characters() {
        assert_eq!(excerpt("sampah plastik", 6), "sampah...");
        assert_eq!(excerpt("ñañaña", 3), "ñañ...");
        assert_eq!(excerpt("ok", 3), "ok");
    }

    #[test]
    fn select_shows_option_label() {
        let options =
            SelectOptions::new(vec![crate::types::SelectOption::new("pub", "Dipublikasikan")])
                .unwrap();
        let col = ColumnDescriptor::new(key("status"), "Status", ColumnKind::Select)
            .with_options(options);
        assert_eq!(
            render(&col, &entity(json!({"status": "pub"})), &ctx()),
            Cell::text("Dipublikasikan")
        );
        assert_eq!(
            render(&col, &entity(json!({"status": "x"})), &ctx()),
            Cell::text("x")
        );
    }

    #[test]
    fn override_wins() {
        let col = ColumnDescriptor::text(key("amount"), "Jumlah")
            .with_render(|v, _| Cell::text(format!("{} Kg", v)));
        assert_eq!(render(&col, &entity(json!({"amount": 5})), &ctx()), Cell::text("5 Kg"));
    }

    #[test]
    fn cell_serializes_tagged() {
        let json = serde_json::to_value(Cell::badge("Gagal", BadgeCategory::Failure)).unwrap();
        assert_eq!(json, json!({"type": "badge", "text": "Gagal", "category": "failure"}));
    }
}
