use uuid::Uuid;

pub type Id = String;

/// Route prefix every catalog page is mounted under
pub const CATALOG_PREFIX: &str = "/catalog";

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}
