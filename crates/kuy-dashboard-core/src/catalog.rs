//! Built-in schemas for every dashboard page.

use serde_json::json;

use crate::error::SchemaError;
use crate::render::{BadgeCategory, StatusResolver};
use crate::types::{
    CardField, CardSection, ColumnDescriptor, ColumnKey, ColumnKind, Entity, EntitySchema,
    SelectOptions,
};

/// Entity kinds in sidebar order.
pub const KINDS: &[&str] = &[
    "pickups",
    "deliveries",
    "points",
    "blogs",
    "users",
    "profile",
    "transactions",
];

fn key(name: &str) -> Result<ColumnKey, SchemaError> {
    ColumnKey::new(name)
}

fn text(name: &str, label: &str) -> Result<ColumnDescriptor, SchemaError> {
    Ok(ColumnDescriptor::text(key(name)?, label))
}

fn column(name: &str, label: &str, kind: ColumnKind) -> Result<ColumnDescriptor, SchemaError> {
    Ok(ColumnDescriptor::new(key(name)?, label, kind))
}

fn fields(names: &[&str]) -> Result<Vec<CardField>, SchemaError> {
    names.iter().map(|n| key(n).map(CardField::new)).collect()
}

fn transaction_status() -> Result<ColumnDescriptor, SchemaError> {
    Ok(column("status", "Status", ColumnKind::Status)?
        .with_options(SelectOptions::plain(["Berhasil", "Proses", "Gagal"])?))
}

/// Yuk Angkut pickup requests.
pub fn pickups() -> Result<EntitySchema, SchemaError> {
    EntitySchema::builder("pickups", "pickup_id")
        .title("Yuk Angkut")
        .subtitle("Kelola penjemputan sampah")
        .endpoint("/api/pickups")
        .column(text("pickup_id", "Pickup ID")?)
        .column(text("name", "Nama")?.required())
        .column(text("location", "Lokasi")?.required())
        .column(text("driver", "Driver")?)
        .column(text("type", "Jenis")?)
        .column(text("amount", "Jumlah(Kg)")?)
        .column(column("date", "Tanggal & Jam", ColumnKind::date_with_time(key("time")?))?)
        .column(transaction_status()?)
        .card_section(CardSection::new(
            "Personal Info",
            fields(&["name", "location", "driver"])?,
        ))
        .card_section(CardSection::new(
            "Pickup Details",
            vec![
                CardField::new(key("type")?),
                CardField::labeled(key("amount")?, "Jumlah"),
                CardField::labeled(key("date")?, "Waktu"),
            ],
        ))
        .build()
}

/// Yuk Buang drop-off deliveries, with a receipt photo.
pub fn deliveries() -> Result<EntitySchema, SchemaError> {
    EntitySchema::builder("deliveries", "delivery_id")
        .title("Yuk Buang")
        .subtitle("Kelola pengantaran sampah")
        .endpoint("/api/deliveries")
        .column(text("delivery_id", "Delivery ID")?)
        .column(text("name", "Nama")?.required())
        .column(text("location", "Lokasi")?)
        .column(text("type", "Jenis")?)
        .column(text("amount", "Jumlah(Kg)")?)
        .column(column("photo", "Foto", ColumnKind::Image)?)
        .column(column("date", "Tanggal & Jam", ColumnKind::date_with_time(key("time")?))?)
        .column(transaction_status()?)
        .card_section(CardSection::new("Personal Info", fields(&["name", "location"])?))
        .card_section(CardSection::new(
            "Delivery Details",
            vec![
                CardField::new(key("type")?),
                CardField::labeled(key("amount")?, "Jumlah"),
                CardField::new(key("photo")?),
                CardField::labeled(key("date")?, "Waktu"),
            ],
        ))
        .build()
}

/// Kuy Point redemptions.
pub fn points() -> Result<EntitySchema, SchemaError> {
    EntitySchema::builder("points", "id")
        .title("Kuy Point")
        .subtitle("Kelola penukaran poin")
        .endpoint("/api/points")
        .column(text("id", "ID Penukaran")?)
        .column(text("name", "Nama")?.required())
        .column(text("wallet", "E-Wallet")?.required())
        .column(text("number", "Nomor E-Wallet")?.required())
        .column(text("point", "Poin")?)
        .column(text("give", "Hadiah")?)
        .column(transaction_status()?)
        .card_section(CardSection::new(
            "Personal Info",
            fields(&["name", "wallet", "number"])?,
        ))
        .card_section(CardSection::new(
            "Redemption Details",
            fields(&["id", "point", "give"])?,
        ))
        .build()
}

/// Blog posts. New posts start as drafts.
pub fn blogs() -> Result<EntitySchema, SchemaError> {
    EntitySchema::builder("blogs", "id")
        .title("Blog")
        .subtitle("Kelola artikel edukasi")
        .endpoint("/api/blogs")
        .status_resolver(StatusResolver::Custom(vec![
            ("Dipublikasikan".to_string(), BadgeCategory::Success),
            ("Draft".to_string(), BadgeCategory::Pending),
        ]))
        .column(text("judul", "Judul")?.required())
        .column(column("isiBlog", "Isi Blog", ColumnKind::RichText)?.required())
        .column(text("penulis", "Penulis")?.required())
        .column(column("tanggalPublikasi", "Tanggal Publikasi", ColumnKind::date())?)
        .column(column("banner", "Banner", ColumnKind::Image)?)
        .column(
            column("status", "Status", ColumnKind::Status)?
                .with_options(SelectOptions::plain(["Dipublikasikan", "Draft"])?),
        )
        .card_section(CardSection::new(
            "Blog Details",
            fields(&["judul", "isiBlog", "penulis", "tanggalPublikasi", "banner", "status"])?,
        ))
        .template(Entity::from_iter([("status", json!("Draft"))]))
        .build()
}

/// Admin accounts. New admins default to the `Admin` role and `Aktif` status.
pub fn users() -> Result<EntitySchema, SchemaError> {
    EntitySchema::builder("users", "id")
        .title("Users")
        .subtitle("Kelola akun admin")
        .endpoint("/api/user/admins")
        .column(text("name", "Nama")?.required())
        .column(text("email", "Email")?.required())
        .column(text("number", "Nomor Telepon")?)
        .column(text("addres", "Alamat")?)
        .column(column("role", "Role", ColumnKind::Role)?)
        .column(
            column("status", "Status", ColumnKind::Status)?
                .with_options(SelectOptions::plain(["Aktif", "Nonaktif"])?),
        )
        .card_section(CardSection::new(
            "Personal Info",
            fields(&["name", "email", "number", "addres", "role"])?,
        ))
        .template(Entity::from_iter([
            ("role", json!("Admin")),
            ("status", json!("Aktif")),
        ]))
        .build()
}

/// The signed-in admin.
pub fn profile() -> Result<EntitySchema, SchemaError> {
    EntitySchema::builder("profile", "id")
        .title("Profile")
        .subtitle("Akun yang sedang masuk")
        .endpoint("/api/user/profile")
        .column(text("name", "Nama")?.required())
        .column(text("email", "Email")?.required())
        .column(text("number", "Nomor Telepon")?)
        .column(text("addres", "Alamat")?)
        .column(column("role", "Role", ColumnKind::Role)?)
        .card_section(CardSection::new(
            "Personal Info",
            fields(&["name", "email", "number", "addres", "role"])?,
        ))
        .build()
}

/// Latest transactions on the dashboard overview. Read-only; rows carry no
/// key and are addressed by position.
pub fn transactions() -> Result<EntitySchema, SchemaError> {
    EntitySchema::builder("transactions", "id")
        .title("Transaksi Terbaru")
        .endpoint("/api/dashboard/data")
        .column(text("name", "Nama")?)
        .column(text("email", "Email")?)
        .column(text("type", "Tipe Transaksi")?)
        .column(text("amount", "Jumlah (Kg)")?)
        .column(text("price_per_kg", "Harga/Kg")?)
        .column(text("total_harga", "Total Harga")?)
        .build()
}

/// Looks up a built-in schema by kind.
pub fn by_kind(kind: &str) -> Option<Result<EntitySchema, SchemaError>> {
    let schema = match kind {
        "pickups" => pickups(),
        "deliveries" => deliveries(),
        "points" => points(),
        "blogs" => blogs(),
        "users" | "admins" => users(),
        "profile" => profile(),
        "transactions" => transactions(),
        _ => return None,
    };
    Some(schema)
}

/// All built-in schemas in sidebar order.
pub fn all() -> Result<Vec<EntitySchema>, SchemaError> {
    KINDS
        .iter()
        .filter_map(|kind| by_kind(kind))
        .collect()
}
