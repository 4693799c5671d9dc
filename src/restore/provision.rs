// pgdump-etl/src/restore/provision.rs
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::errors::Result;
use crate::utils::database::{quote_literal, validate_identifier, StatementRunner};

pub const DEFAULT_TABLE_NAME: &str = "order_details";

/// Pause between executing the schema DDL and committing it.
pub const SCHEMA_SETTLE: Duration = Duration::from_secs(5);
/// Pause between executing CREATE ROLE and committing it.
pub const ROLE_SETTLE: Duration = Duration::from_secs(2);

/// Destination table for the CSV backup. References `orders` and `products`,
/// which the restored dump is expected to provide.
pub const ORDER_DETAILS_DDL: &str = r#"
CREATE TABLE public.order_details (
    order_id smallint NOT NULL,
    product_id smallint NOT NULL,
    unit_price real,
    quantity smallint NOT NULL,
    discount real
);
ALTER TABLE public.order_details
    ADD CONSTRAINT pk_order_details PRIMARY KEY (order_id, product_id);
ALTER TABLE public.order_details
    ADD CONSTRAINT fk_order_details_orders FOREIGN KEY (order_id) REFERENCES orders(order_id);
ALTER TABLE public.order_details
    ADD CONSTRAINT fk_order_details_products FOREIGN KEY (product_id) REFERENCES products(product_id);
"#;

/// Creates the destination table. Database errors propagate.
pub async fn create_schema<R: StatementRunner>(runner: &R, settle: Duration) -> Result<()> {
    info!("Create new Table: '{}'", DEFAULT_TABLE_NAME);
    info!("Execute SQL COMMAND: {}", ORDER_DETAILS_DDL.trim());
    runner.run_unit(ORDER_DETAILS_DDL, settle).await?;
    info!("✓ The creation of the Table '{}' was a success", DEFAULT_TABLE_NAME);
    Ok(())
}

pub fn copy_statement(csv_path: &Path, table_name: &str) -> Result<String> {
    validate_identifier(table_name, true)?;
    Ok(format!(
        "COPY {} FROM {} DELIMITER ',' CSV HEADER;",
        table_name,
        quote_literal(&csv_path.to_string_lossy())
    ))
}

/// Server-side `COPY` of a header-bearing CSV into `table_name`.
///
/// The path is opened by the database server, not by this process.
pub async fn load_csv<R: StatementRunner>(runner: &R, csv_path: &Path, table_name: &str) -> Result<()> {
    let statement = copy_statement(csv_path, table_name)?;
    info!("Execute SQL COMMAND: {}", statement);
    runner.run_unit(&statement, Duration::ZERO).await?;
    info!("✓ CSV {} copied into {}", csv_path.display(), table_name);
    Ok(())
}

pub fn create_role_statement(new_user: &str, password: &str) -> Result<String> {
    validate_identifier(new_user, false)?;
    Ok(format!(
        "CREATE ROLE {} LOGIN PASSWORD {};",
        new_user,
        quote_literal(password)
    ))
}

/// Creates a login role unless it is the role already connecting.
///
/// Returns whether a role was created. Not idempotent: an existing role
/// surfaces as a database error.
pub async fn create_role_if_different<R: StatementRunner>(
    runner: &R,
    current_user: &str,
    new_user: &str,
    password: &str,
    settle: Duration,
) -> Result<bool> {
    if new_user == current_user {
        info!("Role {} is the connecting role, nothing to create", new_user);
        return Ok(false);
    }
    let statement = create_role_statement(new_user, password)?;
    info!("Create new user: {}", new_user);
    runner.run_unit(&statement, settle).await?;
    info!("✓ Role {} created", new_user);
    Ok(true)
}
