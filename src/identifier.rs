use uuid::Uuid;

/// Generates the opaque external identifier assigned to new users, categories and posts.
/// Clients only ever see these; internal primary keys stay server-side.
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}
