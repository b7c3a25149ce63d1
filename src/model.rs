use std::fmt;

/// One assembled database/catalog snapshot.
///
/// Built in a single pass by the schema reader and read-only afterwards. The
/// name starts as the caller-supplied catalog name and is replaced by the
/// catalog name reported by the live connection once assembly finishes.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    pub name: String,
    pub tables: Vec<Table>,
}

impl SchemaModel {
    pub fn new(name: impl Into<String>) -> Self {
        SchemaModel {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Foreign-key constraints of the named table, if it exists in the model.
    pub fn foreign_keys_of(&self, table_name: &str) -> Option<&[FkConstraint]> {
        self.tables
            .iter()
            .find(|t| t.name == table_name)
            .map(|t| t.foreign_keys.as_slice())
    }
}

/// Metadata for a single table or view.
#[derive(Debug, Clone)]
pub struct Table {
    pub id: String,
    pub name: String,
    pub kind: TableKind,
    pub comment: Option<String>,
    /// Columns in probe-query order; never reordered or deduplicated.
    pub columns: Vec<Column>,
    /// Absent when the table has no primary key. Callers must check for
    /// absence, not for an empty column list.
    pub primary_key: Option<PkConstraint>,
    pub indexes: Vec<IndexConstraint>,
    pub foreign_keys: Vec<FkConstraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Table,
    View,
}

impl TableKind {
    /// Map a driver-reported table type onto the model's kind. Anything that
    /// is not a view is treated as a plain table.
    pub fn from_type_str(table_type: &str) -> Self {
        if table_type.eq_ignore_ascii_case("VIEW") {
            TableKind::View
        } else {
            TableKind::Table
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Table => "TABLE",
            TableKind::View => "VIEW",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for a single column.
///
/// The pk/fk/unique flags are derived during assembly from the key and index
/// constraints, not taken from the driver's column rows.
#[derive(Debug, Clone)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub label: Option<String>,
    /// Declared SQL type name as reported by the probe query.
    pub type_name: String,
    /// Driver-level type code (for PostgreSQL, the type oid).
    pub type_code: i32,
    /// Host-language type the driver would map this column to, if known.
    pub host_type: Option<String>,
    pub nullable: bool,
    pub auto_increment: bool,
    pub is_pk: bool,
    pub is_fk: bool,
    pub is_unique: bool,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
    pub comment: Option<String>,
    pub default_value: Option<String>,
    /// Name of the referenced (pk) table when this column is a foreign key.
    pub referenced_table: Option<String>,
    /// Name of the owning table.
    pub table: String,
}

/// Primary key of one table: constraint name plus columns in key order.
#[derive(Debug, Clone)]
pub struct PkConstraint {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

/// One named foreign-key relationship, grouping the column pairs that share
/// a constraint name.
#[derive(Debug, Clone)]
pub struct FkConstraint {
    pub id: String,
    pub name: String,
    /// The owning (referencing) table.
    pub fk_table: String,
    /// The referenced (primary-key) table.
    pub pk_table: String,
    /// Column pairs in row delivery order.
    pub imported_keys: Vec<ImportedKey>,
}

/// One column pair within a foreign-key constraint, as seen from the
/// referencing table.
#[derive(Debug, Clone)]
pub struct ImportedKey {
    pub id: String,
    pub pk_column: String,
    pub fk_column: String,
    pub update_rule: Option<String>,
    pub delete_rule: Option<String>,
    /// Flags copied from the owning table's matching column.
    pub nullable: bool,
    pub unique: bool,
    pub is_pk: bool,
}

/// One named index, merged from all index rows sharing its name.
#[derive(Debug, Clone)]
pub struct IndexConstraint {
    pub id: String,
    pub name: String,
    pub index_type: Option<String>,
    pub ordering: Option<String>,
    /// Distinct column names; merge order, no positional meaning.
    pub columns: Vec<String>,
}

impl IndexConstraint {
    pub fn covers(&self, column_name: &str) -> bool {
        self.columns.iter().any(|c| c == column_name)
    }
}
