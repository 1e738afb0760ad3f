//! In-process table registry with a SQL front end
//!
//! Tables are held as materialised frames and registered into a fresh
//! [`SQLContext`] for each query, so every query sees the current contents
//! and nothing is cached between calls.

use crate::error::{InsightsError, Result};
use crate::filters::Predicate;
use polars::prelude::*;
use polars::sql::SQLContext;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Named tables available to SQL queries
#[derive(Debug, Clone, Default)]
pub struct Store {
    tables: Arc<RwLock<BTreeMap<String, DataFrame>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `df` under `name`, replacing any existing table
    pub fn register(&self, name: &str, df: DataFrame) -> Result<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| InsightsError::Other(format!("Lock poisoned: {e}")))?;
        debug!(table = name, rows = df.height(), cols = df.width(), "Registering table");
        tables.insert(name.to_owned(), df);
        Ok(())
    }

    /// Returns whether a table was removed
    pub fn unregister(&self, name: &str) -> Result<bool> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| InsightsError::Other(format!("Lock poisoned: {e}")))?;
        Ok(tables.remove(name).is_some())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.tables
            .read()
            .is_ok_and(|tables| tables.contains_key(name))
    }

    pub fn table_names(&self) -> Result<Vec<String>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| InsightsError::Other(format!("Lock poisoned: {e}")))?;
        Ok(tables.keys().cloned().collect())
    }

    /// Snapshot of a registered table
    pub fn table(&self, name: &str) -> Result<DataFrame> {
        let tables = self
            .tables
            .read()
            .map_err(|e| InsightsError::Other(format!("Lock poisoned: {e}")))?;
        tables
            .get(name)
            .cloned()
            .ok_or_else(|| InsightsError::TableNotFound(name.to_owned()))
    }

    /// Schema of a table as rows of `column_name`, `column_type`, `null_count`
    pub fn describe(&self, name: &str) -> Result<DataFrame> {
        let df = self.table(name)?;
        let columns = df.get_columns();

        let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
        let types: Vec<String> = columns.iter().map(|c| c.dtype().to_string()).collect();
        let nulls: Vec<u64> = columns.iter().map(|c| c.null_count() as u64).collect();

        Ok(DataFrame::new(vec![
            Column::from(Series::new("column_name".into(), names)),
            Column::from(Series::new("column_type".into(), types)),
            Column::from(Series::new("null_count".into(), nulls)),
        ])?)
    }

    /// Run SQL against every registered table
    pub fn query(&self, sql: &str) -> Result<DataFrame> {
        let mut ctx = SQLContext::new();
        {
            let tables = self
                .tables
                .read()
                .map_err(|e| InsightsError::Other(format!("Lock poisoned: {e}")))?;
            for (name, df) in tables.iter() {
                ctx.register(name, df.clone().lazy());
            }
        }

        debug!(sql, "Running query");
        run(&mut ctx, sql)
    }

    /// Run SQL against a single table after narrowing its rows
    ///
    /// The predicate is applied as an expression on the frame; the SQL text
    /// itself never contains the filter values.
    pub fn query_filtered(
        &self,
        table: &str,
        predicate: &Predicate,
        sql: &str,
    ) -> Result<DataFrame> {
        let mut lf = self.table(table)?.lazy();
        if let Some(expr) = predicate.to_expr() {
            lf = lf.filter(expr);
        }

        debug!(table, predicate = %predicate, sql, "Running filtered query");
        let mut ctx = SQLContext::new();
        ctx.register(table, lf);
        run(&mut ctx, sql)
    }
}

fn run(ctx: &mut SQLContext, sql: &str) -> Result<DataFrame> {
    ctx.execute(sql)
        .and_then(LazyFrame::collect)
        .map_err(|e| {
            let message = e.to_string();
            match missing_relation(&message) {
                Some(name) => InsightsError::TableNotFound(name),
                None => InsightsError::Query {
                    sql: sql.to_owned(),
                    message,
                },
            }
        })
}

/// Table name from a "relation 'x' was not found" error
fn missing_relation(message: &str) -> Option<String> {
    let rest = &message[message.find("relation '")? + "relation '".len()..];
    let end = rest.find('\'')?;
    rest[end..]
        .contains("not found")
        .then(|| rest[..end].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn sample() -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Column::from(Series::new("Category".into(), vec!["Clothing", "Footwear", "Clothing"])),
            Column::from(Series::new("amount".into(), vec![Some(10.0), None, Some(5.0)])),
        ])?)
    }

    #[test]
    fn test_register_and_query() -> Result<()> {
        let store = Store::new();
        store.register("shopping", sample()?)?;
        assert!(store.exists("shopping"));
        assert!(!store.exists("airbnb"));

        let df = store.query(
            "SELECT Category, COUNT(*) AS n FROM shopping GROUP BY Category ORDER BY Category",
        )?;
        assert_eq!(df.height(), 2);
        let counts: Vec<Option<i64>> = df
            .column("n")?
            .as_materialized_series()
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .collect();
        assert_eq!(counts, vec![Some(2), Some(1)]);
        Ok(())
    }

    #[test]
    fn test_register_replaces() -> Result<()> {
        let store = Store::new();
        store.register("shopping", sample()?)?;
        store.register("shopping", sample()?.head(Some(1)))?;
        assert_eq!(store.table("shopping")?.height(), 1);
        assert_eq!(store.table_names()?, vec!["shopping".to_owned()]);
        Ok(())
    }

    #[test]
    fn test_missing_table() -> Result<()> {
        let store = Store::new();
        let err = store.query("SELECT * FROM airbnb");
        assert!(matches!(err, Err(InsightsError::TableNotFound(ref t)) if t == "airbnb"));

        let err = store.describe("airbnb");
        assert!(matches!(err, Err(InsightsError::TableNotFound(_))));

        let err = store.query_filtered("airbnb", &Predicate::new(), "SELECT * FROM airbnb");
        assert!(matches!(err, Err(InsightsError::TableNotFound(_))));
        Ok(())
    }

    #[test]
    fn test_malformed_query() -> Result<()> {
        let store = Store::new();
        store.register("shopping", sample()?)?;
        match store.query("SELEKT nothing FROM") {
            Err(InsightsError::Query { sql, .. }) => assert_eq!(sql, "SELEKT nothing FROM"),
            other => panic!("expected query error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_describe() -> Result<()> {
        let store = Store::new();
        store.register("shopping", sample()?)?;
        let schema = store.describe("shopping")?;
        assert_eq!(schema.height(), 2);
        assert_eq!(
            schema.get_column_names_str(),
            vec!["column_name", "column_type", "null_count"]
        );
        let nulls = schema
            .column("null_count")?
            .as_materialized_series()
            .u64()?
            .get(1);
        assert_eq!(nulls, Some(1));
        Ok(())
    }

    #[test]
    fn test_unregister() -> Result<()> {
        let store = Store::new();
        store.register("shopping", sample()?)?;
        assert!(store.unregister("shopping")?);
        assert!(!store.unregister("shopping")?);
        assert!(!store.exists("shopping"));
        Ok(())
    }

    #[test]
    fn test_query_filtered() -> Result<()> {
        let store = Store::new();
        store.register("shopping", sample()?)?;
        let predicate = Predicate::new().is_in("Category", &["Clothing".to_owned()]);
        let df = store.query_filtered(
            "shopping",
            &predicate,
            "SELECT Category, COUNT(*) AS n FROM shopping GROUP BY Category",
        )?;
        assert_eq!(df.height(), 1);
        let n = df
            .column("n")?
            .as_materialized_series()
            .cast(&DataType::Int64)?
            .i64()?
            .get(0);
        assert_eq!(n, Some(2));
        Ok(())
    }

    #[test]
    fn test_missing_relation_parsing() {
        assert_eq!(
            missing_relation("sql error: relation 'airbnb' was not found"),
            Some("airbnb".to_owned())
        );
        assert_eq!(missing_relation("column 'x' not found"), None);
    }
}
