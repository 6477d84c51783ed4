use drift_core::migrate::{sql, Change, Op, Renderer};
use drift_core::schema::{Field, FieldSchema, Model, ModelRegistry};
use drift_core::snapshot::TableSnapshot;
use drift_core::{Error, SchemaDiff, Snapshot};
use pretty_assertions::assert_eq;
use serde_json::Value;

struct User;

impl Model for User {
    fn model_name(&self) -> String {
        "User".to_string()
    }

    fn table_name(&self) -> String {
        "users".to_string()
    }

    fn declared_fields(&self) -> Vec<Field> {
        vec![Field::make("email").string()]
    }
}

fn field(field: Field) -> FieldSchema {
    field.to_schema("t").unwrap()
}

fn table(model: &str, fields: Vec<(&str, FieldSchema)>) -> TableSnapshot {
    TableSnapshot {
        model: model.to_string(),
        model_args: Value::Null,
        fields: fields
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema))
            .collect(),
    }
}

fn snapshot(tables: Vec<(&str, TableSnapshot)>) -> Snapshot {
    Snapshot {
        tables: tables
            .into_iter()
            .map(|(name, table)| (name.to_string(), table))
            .collect(),
    }
}

fn posts_table(extra: Vec<(&str, FieldSchema)>) -> TableSnapshot {
    let mut fields = vec![
        ("id", field(Field::make("id").increments())),
        ("title", field(Field::make("title").string())),
    ];
    fields.extend(extra);
    fields.push((
        "created_at",
        field(Field::make("created_at").timestamp().nullable().index()),
    ));
    fields.push((
        "updated_at",
        field(Field::make("updated_at").timestamp().nullable().index()),
    ));
    table("Post", fields)
}

#[test]
fn created_table_renders_columns_in_declared_order() {
    let registry = ModelRegistry::new();
    let renderer = Renderer::new(&registry);

    let old = Snapshot::default();
    let new = snapshot(vec![("posts", posts_table(vec![]))]);
    let ops = renderer.ops(&SchemaDiff::from(&old, &new)).unwrap();

    assert_eq!(ops.len(), 1);
    let Op::CreateTable { table, columns } = &ops[0] else {
        panic!("expected a create-table op, got {:?}", ops[0]);
    };
    assert_eq!(table, "posts");
    let names: Vec<_> = columns.iter().map(|c| c.name.clone()).collect();
    assert_eq!(names, ["id", "title", "created_at", "updated_at"]);

    assert_eq!(
        sql(&ops),
        "CREATE TABLE `posts` (\n\
         \x20 `id` INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,\n\
         \x20 `title` VARCHAR(255) NOT NULL,\n\
         \x20 `created_at` TIMESTAMP NULL,\n\
         \x20 `updated_at` TIMESTAMP NULL,\n\
         \x20 KEY `posts_created_at_index` (`created_at`),\n\
         \x20 KEY `posts_updated_at_index` (`updated_at`)\n\
         );\n"
    );
}

#[test]
fn foreign_keys_follow_all_column_definitions() {
    let user = User;
    let models: &[&dyn Model] = &[&user];
    let registry = ModelRegistry::from_models(models);
    let renderer = Renderer::new(&registry);

    let old = Snapshot::default();
    let new = snapshot(vec![
        (
            "posts",
            posts_table(vec![(
                "user_id",
                field(Field::make("user_id").belongs_to("User")),
            )]),
        ),
        (
            "users",
            table("User", vec![("id", field(Field::make("id").increments()))]),
        ),
    ]);
    let ops = renderer.ops(&SchemaDiff::from(&old, &new)).unwrap();

    assert_eq!(ops.len(), 3);
    assert!(matches!(&ops[0], Op::CreateTable { table, .. } if table == "posts"));
    assert!(matches!(&ops[1], Op::CreateTable { table, .. } if table == "users"));
    assert_eq!(
        ops[2],
        Op::AddForeignKey {
            table: "posts".to_string(),
            column: "user_id".to_string(),
            references_table: "users".to_string(),
            references_column: "id".to_string(),
        }
    );

    assert!(sql(&ops).contains(
        "ALTER TABLE `posts`\n\
         \x20 ADD CONSTRAINT `posts_user_id_foreign` FOREIGN KEY (`user_id`) \
         REFERENCES `users` (`id`);"
    ));
}

#[test]
fn deleted_belongs_to_field_is_bracketed_by_constraint_toggles() {
    let registry = ModelRegistry::new();
    let renderer = Renderer::new(&registry);

    let old = snapshot(vec![(
        "posts",
        posts_table(vec![(
            "user_id",
            field(Field::make("user_id").belongs_to("User")),
        )]),
    )]);
    let new = snapshot(vec![("posts", posts_table(vec![]))]);
    let ops = renderer.ops(&SchemaDiff::from(&old, &new)).unwrap();

    assert_eq!(
        ops,
        vec![Op::AlterTable {
            table: "posts".to_string(),
            changes: vec![
                Change::DisableConstraints,
                Change::DropForeignKey("user_id".to_string()),
                Change::EnableConstraints,
                Change::DropColumn("user_id".to_string()),
            ],
        }]
    );

    assert_eq!(
        sql(&ops),
        "SET FOREIGN_KEY_CHECKS = 0;\n\
         \n\
         ALTER TABLE `posts`\n\
         \x20 DROP FOREIGN KEY `posts_user_id_foreign`;\n\
         \n\
         SET FOREIGN_KEY_CHECKS = 1;\n\
         \n\
         ALTER TABLE `posts`\n\
         \x20 DROP COLUMN `user_id`;\n"
    );
}

#[test]
fn modified_belongs_to_column_drops_and_readds_the_constraint() {
    let user = User;
    let models: &[&dyn Model] = &[&user];
    let registry = ModelRegistry::from_models(models);
    let renderer = Renderer::new(&registry);

    let old = snapshot(vec![(
        "posts",
        posts_table(vec![(
            "user_id",
            field(Field::make("user_id").belongs_to("User")),
        )]),
    )]);
    let new = snapshot(vec![(
        "posts",
        posts_table(vec![(
            "user_id",
            field(Field::make("user_id").belongs_to("User").nullable()),
        )]),
    )]);
    let ops = renderer.ops(&SchemaDiff::from(&old, &new)).unwrap();

    assert_eq!(ops.len(), 2);
    let Op::AlterTable { changes, .. } = &ops[0] else {
        panic!("expected an alter-table op, got {:?}", ops[0]);
    };
    assert!(matches!(&changes[0], Change::ModifyColumn(col) if col.name == "user_id"));
    assert_eq!(
        changes[1..],
        [
            Change::DisableConstraints,
            Change::DropForeignKey("user_id".to_string()),
            Change::EnableConstraints,
        ]
    );
    assert!(matches!(&ops[1], Op::AddForeignKey { column, .. } if column == "user_id"));
}

#[test]
fn dropped_tables_share_one_constraint_bracket() {
    let registry = ModelRegistry::new();
    let renderer = Renderer::new(&registry);

    let old = snapshot(vec![
        ("posts", posts_table(vec![])),
        (
            "users",
            table("User", vec![("id", field(Field::make("id").increments()))]),
        ),
    ]);
    let new = Snapshot::default();
    let ops = renderer.ops(&SchemaDiff::from(&old, &new)).unwrap();

    assert_eq!(
        ops,
        vec![
            Op::DisableConstraints,
            Op::DropTable {
                table: "posts".to_string()
            },
            Op::DropTable {
                table: "users".to_string()
            },
            Op::EnableConstraints,
        ]
    );

    assert_eq!(
        sql(&ops),
        "SET FOREIGN_KEY_CHECKS = 0;\n\
         \n\
         DROP TABLE `posts`;\n\
         \n\
         DROP TABLE `users`;\n\
         \n\
         SET FOREIGN_KEY_CHECKS = 1;\n"
    );
}

#[test]
fn unresolvable_relation_target_aborts_the_render() {
    let registry = ModelRegistry::new();
    let renderer = Renderer::new(&registry);

    let old = Snapshot::default();
    let new = snapshot(vec![(
        "posts",
        posts_table(vec![(
            "author_id",
            field(Field::make("author_id").belongs_to("Author")),
        )]),
    )]);
    let err = renderer.ops(&SchemaDiff::from(&old, &new)).unwrap_err();

    assert_eq!(err, Error::UnresolvedTarget {
        model: "Author".to_string(),
        column: "author_id".to_string(),
    });
}

#[test]
fn script_pairs_up_and_down_sections() {
    let registry = ModelRegistry::new();
    let renderer = Renderer::new(&registry);

    let old = Snapshot::default();
    let new = snapshot(vec![("posts", posts_table(vec![]))]);
    let up = SchemaDiff::from(&old, &new);
    let down = SchemaDiff::from(&new, &old);

    let script = renderer
        .script(&up, &down, "create_posts_table_1700000000")
        .unwrap();

    assert!(script.starts_with("-- Migration: create_posts_table_1700000000\n"));
    let up_at = script.find("-- up\n").unwrap();
    let down_at = script.find("-- down\n").unwrap();
    assert!(up_at < down_at);

    let (up_sql, down_sql) = script.split_at(down_at);
    assert!(up_sql.contains("CREATE TABLE `posts`"));
    assert!(down_sql.contains("DROP TABLE `posts`;"));
    assert!(!down_sql.contains("CREATE TABLE"));
}

#[test]
fn defaults_render_quoted_and_raw() {
    let registry = ModelRegistry::new();
    let renderer = Renderer::new(&registry);

    let old = Snapshot::default();
    let new = snapshot(vec![(
        "settings",
        table(
            "Setting",
            vec![
                ("id", field(Field::make("id").increments())),
                (
                    "label",
                    field(Field::make("label").string().default("it's on")),
                ),
                ("retries", field(Field::make("retries").integer().default(3))),
                (
                    "expires_at",
                    field(Field::make("expires_at").timestamp().use_current()),
                ),
                (
                    "uid",
                    field(Field::make("uid").string_len(36).raw_default("(UUID())")),
                ),
            ],
        ),
    )]);
    let ops = renderer.ops(&SchemaDiff::from(&old, &new)).unwrap();
    let sql = sql(&ops);

    assert!(sql.contains("`label` VARCHAR(255) NOT NULL DEFAULT 'it''s on'"));
    assert!(sql.contains("`retries` INT NOT NULL DEFAULT 3"));
    assert!(sql.contains("`expires_at` TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP"));
    assert!(sql.contains("`uid` VARCHAR(36) NOT NULL DEFAULT (UUID())"));
}
