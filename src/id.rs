use uuid::Uuid;

/// Generate an opaque unique id for a model entity.
///
/// Ids identify entities within one assembled model; they are not stable
/// across runs and carry no meaning beyond uniqueness.
pub fn fresh_id() -> String {
    Uuid::new_v4().simple().to_string()
}
