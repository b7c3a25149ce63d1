use crate::model::PkConstraint;
use crate::source::PrimaryKeyRow;

/// Fold a table's primary-key rows into at most one constraint.
///
/// Columns are kept in delivery order (the source orders rows by key
/// sequence); the constraint name is the first non-empty name seen. No rows
/// means no primary key, not an empty constraint.
pub fn resolve_primary_key(rows: &[PrimaryKeyRow]) -> Option<PkConstraint> {
    if rows.is_empty() {
        return None;
    }
    let columns = rows.iter().map(|r| r.column_name.clone()).collect();
    let name = rows.iter().find_map(|r| {
        r.pk_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    });
    Some(PkConstraint { name, columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::pk_row;

    #[test]
    fn test_no_rows_means_no_primary_key() {
        assert!(resolve_primary_key(&[]).is_none());
    }

    #[test]
    fn test_columns_keep_delivery_order() {
        let rows = vec![
            pk_row("tenant_id", 1, "orders_pkey"),
            pk_row("order_id", 2, "orders_pkey"),
        ];
        let pk = resolve_primary_key(&rows).unwrap();
        assert_eq!(pk.columns, vec!["tenant_id", "order_id"]);
        assert_eq!(pk.name.as_deref(), Some("orders_pkey"));
    }

    #[test]
    fn test_first_non_empty_name_wins() {
        let mut first = pk_row("id", 1, "");
        first.pk_name = None;
        let mut second = pk_row("region", 2, "  ");
        second.pk_name = Some("  ".to_string());
        let third = pk_row("code", 3, "late_name");
        let pk = resolve_primary_key(&[first, second, third]).unwrap();
        assert_eq!(pk.name.as_deref(), Some("late_name"));
        assert_eq!(pk.columns.len(), 3);
    }

    #[test]
    fn test_unnamed_key_keeps_columns() {
        let mut row = pk_row("id", 1, "");
        row.pk_name = None;
        let pk = resolve_primary_key(&[row]).unwrap();
        assert!(pk.name.is_none());
        assert_eq!(pk.columns, vec!["id"]);
    }
}
