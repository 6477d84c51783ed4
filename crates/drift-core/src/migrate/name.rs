use crate::diff::SchemaDiff;

const MAX_NAMED_TABLES: usize = 5;

/// Derives the human-readable migration name:
/// `<action>_<table1>_..._<tableN>_<tables|table>_<unixtime>`.
///
/// The action is the first non-empty bucket in create/update/delete priority
/// order, but the table list spans every bucket in that order. At most five
/// table names are spelled out; pluralization reflects the full affected
/// count and the `table`/`tables` suffix always survives. Callers only name
/// non-empty diffs.
pub fn migration_name(diff: &SchemaDiff, unix_time: u64) -> String {
    let action = if !diff.created.is_empty() {
        "create"
    } else if !diff.updated.is_empty() {
        "update"
    } else {
        "delete"
    };

    let tables: Vec<&String> = diff
        .created
        .keys()
        .chain(diff.updated.keys())
        .chain(diff.deleted.keys())
        .collect();

    let mut parts = vec![action.to_string()];
    parts.extend(tables.iter().take(MAX_NAMED_TABLES).map(|t| t.to_string()));
    parts.push(if tables.len() == 1 { "table" } else { "tables" }.to_string());
    parts.push(unix_time.to_string());
    parts.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::TableDiff;

    fn diff_with(bucket: &str, tables: &[&str]) -> SchemaDiff {
        let mut diff = SchemaDiff::default();
        let target = match bucket {
            "created" => &mut diff.created,
            "updated" => &mut diff.updated,
            _ => &mut diff.deleted,
        };
        for table in tables {
            target.insert(table.to_string(), TableDiff::default());
        }
        diff
    }

    #[test]
    fn single_created_table() {
        let diff = diff_with("created", &["posts"]);
        assert_eq!(migration_name(&diff, 1700000000), "create_posts_table_1700000000");
    }

    #[test]
    fn action_comes_from_the_first_non_empty_bucket() {
        let mut diff = diff_with("created", &["posts"]);
        diff.updated = diff_with("updated", &["users"]).updated;
        diff.deleted = diff_with("deleted", &["tags"]).deleted;
        assert_eq!(migration_name(&diff, 7), "create_posts_users_tags_tables_7");
    }

    #[test]
    fn update_wins_over_delete() {
        let mut diff = diff_with("updated", &["users", "posts"]);
        diff.deleted = diff_with("deleted", &["tags"]).deleted;
        assert_eq!(migration_name(&diff, 7), "update_users_posts_tags_tables_7");
    }

    #[test]
    fn table_list_spans_every_bucket() {
        let mut diff = diff_with("created", &["posts"]);
        diff.deleted = diff_with("deleted", &["tags", "votes"]).deleted;
        assert_eq!(migration_name(&diff, 7), "create_posts_tags_votes_tables_7");
    }

    #[test]
    fn caps_at_five_names_but_keeps_the_suffix() {
        let mut diff = diff_with("created", &["a", "b", "c", "d"]);
        diff.deleted = diff_with("deleted", &["e", "f", "g"]).deleted;
        assert_eq!(migration_name(&diff, 42), "create_a_b_c_d_e_tables_42");
    }
}
