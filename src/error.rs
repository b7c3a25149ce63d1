use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Failed to introspect table {table}: {message}")]
    Table { table: String, message: String },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

impl ScoutError {
    /// Wrap a failure from one table's introspection, keeping the driver's message.
    pub fn table(table: impl Into<String>, cause: &ScoutError) -> Self {
        ScoutError::Table {
            table: table.into(),
            message: cause.to_string(),
        }
    }
}
