use serde_json::Value;

use super::{Change, ColumnDef, Op};
use crate::diff::SchemaDiff;
use crate::schema::{ForeignKeyRef, ResolveTarget};
use crate::{Error, Result};

/// Lowers a [`SchemaDiff`] into ordered operations and assembles migration
/// scripts from them.
///
/// Foreign-key targets are resolved through the given resolver; an identifier
/// it cannot resolve aborts the render.
pub struct Renderer<'a> {
    resolver: &'a dyn ResolveTarget,
}

impl<'a> Renderer<'a> {
    pub fn new(resolver: &'a dyn ResolveTarget) -> Self {
        Self { resolver }
    }

    /// Lowers the diff in block order: created tables, updated tables,
    /// relationships, deleted tables.
    ///
    /// Foreign keys are collected into the separate relationships block so
    /// that every column definition precedes every constraint addition; a
    /// dropped or modified foreign-key column gets its constraint drop
    /// bracketed by disable/enable clauses inside its table's alter block.
    pub fn ops(&self, diff: &SchemaDiff) -> Result<Vec<Op>> {
        let mut ops = vec![];
        let mut relations: Vec<(String, ForeignKeyRef)> = vec![];

        for (table, table_diff) in &diff.created {
            let mut columns = vec![];
            for (name, schema) in &table_diff.created {
                columns.push(ColumnDef::from_schema(name, schema));
                if let Some(fk) = &schema.belongs_to {
                    relations.push((table.clone(), fk.clone()));
                }
            }
            ops.push(Op::CreateTable {
                table: table.clone(),
                columns,
            });
        }

        for (table, table_diff) in &diff.updated {
            let mut changes = vec![];

            for (name, schema) in &table_diff.created {
                changes.push(Change::AddColumn(ColumnDef::from_schema(name, schema)));
                if let Some(fk) = &schema.belongs_to {
                    relations.push((table.clone(), fk.clone()));
                }
            }

            for (name, patch) in &table_diff.updated {
                changes.push(Change::ModifyColumn(ColumnDef::from_patch(name, patch)));
                if let Some(fk) = &patch.belongs_to {
                    changes.push(Change::DisableConstraints);
                    changes.push(Change::DropForeignKey(fk.foreign_key.clone()));
                    changes.push(Change::EnableConstraints);
                    relations.push((table.clone(), fk.clone()));
                }
            }

            for (name, schema) in &table_diff.deleted {
                if schema.belongs_to.is_some() {
                    changes.push(Change::DisableConstraints);
                    changes.push(Change::DropForeignKey(name.clone()));
                    changes.push(Change::EnableConstraints);
                }
                changes.push(Change::DropColumn(name.clone()));
            }

            ops.push(Op::AlterTable {
                table: table.clone(),
                changes,
            });
        }

        for (table, fk) in relations {
            let target = self
                .resolver
                .resolve_target(&fk.model)
                .ok_or_else(|| Error::unresolved_target(&fk.model, &fk.foreign_key))?;
            ops.push(Op::AddForeignKey {
                table,
                column: fk.foreign_key,
                references_table: target.table,
                references_column: target.primary_key,
            });
        }

        if !diff.deleted.is_empty() {
            ops.push(Op::DisableConstraints);
            for table in diff.deleted.keys() {
                ops.push(Op::DropTable {
                    table: table.clone(),
                });
            }
            ops.push(Op::EnableConstraints);
        }

        Ok(ops)
    }

    /// Assembles the complete migration script, `-- up` then `-- down`.
    pub fn script(&self, up: &SchemaDiff, down: &SchemaDiff, name: &str) -> Result<String> {
        let up_ops = self.ops(up)?;
        let down_ops = self.ops(down)?;

        let mut out = String::new();
        out.push_str(&format!("-- Migration: {name}\n\n"));
        out.push_str("-- up\n\n");
        out.push_str(&sql(&up_ops));
        out.push_str("\n-- down\n\n");
        out.push_str(&sql(&down_ops));
        Ok(out)
    }
}

/// Renders operations as MySQL-flavored DDL, one statement per op (alter
/// blocks may split into several around constraint toggles).
pub fn sql(ops: &[Op]) -> String {
    let mut statements = vec![];

    for op in ops {
        match op {
            Op::CreateTable { table, columns } => {
                statements.push(create_table(table, columns));
            }
            Op::AlterTable { table, changes } => {
                statements.extend(alter_table(table, changes));
            }
            Op::AddForeignKey {
                table,
                column,
                references_table,
                references_column,
            } => {
                statements.push(format!(
                    "ALTER TABLE `{table}`\n  ADD CONSTRAINT `{table}_{column}_foreign` \
                     FOREIGN KEY (`{column}`) REFERENCES `{references_table}` (`{references_column}`);"
                ));
            }
            Op::DisableConstraints => {
                statements.push("SET FOREIGN_KEY_CHECKS = 0;".to_string());
            }
            Op::EnableConstraints => {
                statements.push("SET FOREIGN_KEY_CHECKS = 1;".to_string());
            }
            Op::DropTable { table } => {
                statements.push(format!("DROP TABLE `{table}`;"));
            }
        }
    }

    let mut out = statements.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn create_table(table: &str, columns: &[ColumnDef]) -> String {
    let mut lines = vec![];

    for column in columns {
        lines.push(column_sql(column, true));
    }

    // Plain (non-unique) indexes are table-level KEY entries.
    for column in columns {
        if column.index == Some(true) {
            lines.push(format!(
                "KEY `{table}_{name}_index` (`{name}`)",
                name = column.name
            ));
        }
    }

    format!("CREATE TABLE `{table}` (\n  {}\n);", lines.join(",\n  "))
}

fn alter_table(table: &str, changes: &[Change]) -> Vec<String> {
    let mut statements = vec![];
    let mut clauses: Vec<String> = vec![];

    fn flush(table: &str, clauses: &mut Vec<String>, statements: &mut Vec<String>) {
        if !clauses.is_empty() {
            statements.push(format!(
                "ALTER TABLE `{table}`\n  {};",
                clauses.join(",\n  ")
            ));
            clauses.clear();
        }
    }

    for change in changes {
        match change {
            Change::AddColumn(column) => {
                clauses.push(format!("ADD COLUMN {}", column_sql(column, true)));
                if column.index == Some(true) {
                    clauses.push(format!(
                        "ADD INDEX `{table}_{name}_index` (`{name}`)",
                        name = column.name
                    ));
                }
            }
            Change::ModifyColumn(column) => {
                clauses.push(format!("MODIFY COLUMN {}", column_sql(column, false)));
                clauses.extend(key_transitions(table, column));
            }
            Change::DropColumn(name) => {
                clauses.push(format!("DROP COLUMN `{name}`"));
            }
            Change::DropForeignKey(column) => {
                clauses.push(format!("DROP FOREIGN KEY `{table}_{column}_foreign`"));
            }
            Change::DisableConstraints => {
                flush(table, &mut clauses, &mut statements);
                statements.push("SET FOREIGN_KEY_CHECKS = 0;".to_string());
            }
            Change::EnableConstraints => {
                flush(table, &mut clauses, &mut statements);
                statements.push("SET FOREIGN_KEY_CHECKS = 1;".to_string());
            }
        }
    }
    flush(table, &mut clauses, &mut statements);

    statements
}

/// Index, unique and primary transitions of a modified column, as alter
/// clauses. `Some(true)` adds the key, `Some(false)` drops it.
fn key_transitions(table: &str, column: &ColumnDef) -> Vec<String> {
    let name = &column.name;
    let mut clauses = vec![];

    match column.index {
        Some(true) => clauses.push(format!("ADD INDEX `{table}_{name}_index` (`{name}`)")),
        Some(false) => clauses.push(format!("DROP INDEX `{table}_{name}_index`")),
        None => {}
    }
    match column.unique {
        Some(true) => clauses.push(format!(
            "ADD UNIQUE INDEX `{table}_{name}_unique` (`{name}`)"
        )),
        Some(false) => clauses.push(format!("DROP INDEX `{table}_{name}_unique`")),
        None => {}
    }
    match column.primary {
        Some(true) => clauses.push(format!("ADD PRIMARY KEY (`{name}`)")),
        Some(false) => clauses.push("DROP PRIMARY KEY".to_string()),
        None => {}
    }

    clauses
}

/// Renders one column definition. With `inline_keys` (create/add contexts)
/// the unique/primary flags become inline constraints; in modify context
/// they are transitions handled by [`key_transitions`] instead.
fn column_sql(column: &ColumnDef, inline_keys: bool) -> String {
    let mut sql = format!(
        "`{}` {}",
        column.name,
        column_type(&column.ty, &column.type_args)
    );

    if column.ty == "increments" {
        sql.push_str(" NOT NULL AUTO_INCREMENT PRIMARY KEY");
        return sql;
    }

    if column.unsigned == Some(true) && !type_is_unsigned(&column.ty) {
        sql.push_str(" UNSIGNED");
    }

    sql.push_str(if column.nullable == Some(true) {
        " NULL"
    } else {
        " NOT NULL"
    });

    if let Some(default) = &column.default {
        sql.push_str(&format!(" DEFAULT {}", default_sql(default)));
    } else if let Some(raw) = &column.raw_default {
        sql.push_str(&format!(" DEFAULT {raw}"));
    } else if column.use_current == Some(true) {
        sql.push_str(" DEFAULT CURRENT_TIMESTAMP");
    }

    if inline_keys {
        if column.primary == Some(true) {
            sql.push_str(" PRIMARY KEY");
        }
        if column.unique == Some(true) {
            sql.push_str(" UNIQUE");
        }
    }

    sql
}

fn type_is_unsigned(ty: &str) -> bool {
    matches!(ty, "increments" | "unsignedInteger")
}

fn column_type(ty: &str, args: &[Value]) -> String {
    match ty {
        "increments" | "unsignedInteger" => "INT UNSIGNED".to_string(),
        "string" => format!(
            "VARCHAR({})",
            args.first().and_then(Value::as_u64).unwrap_or(255)
        ),
        "text" => "TEXT".to_string(),
        "integer" => "INT".to_string(),
        "bigInteger" => "BIGINT".to_string(),
        "boolean" => "TINYINT(1)".to_string(),
        "timestamp" => "TIMESTAMP".to_string(),
        "datetime" => "DATETIME".to_string(),
        "date" => "DATE".to_string(),
        "decimal" => {
            let precision = args.first().and_then(Value::as_u64).unwrap_or(8);
            let scale = args.get(1).and_then(Value::as_u64).unwrap_or(2);
            format!("DECIMAL({precision},{scale})")
        }
        "json" => "JSON".to_string(),
        "float" => "DOUBLE".to_string(),
        other => {
            // Unknown tags pass through uppercased with their raw arguments.
            let tag = other.to_uppercase();
            if args.is_empty() {
                tag
            } else {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                format!("{tag}({})", args.join(","))
            }
        }
    }
}

/// JSON-encodes a default value for DDL; strings are single-quoted with
/// `''` escaping.
fn default_sql(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}
