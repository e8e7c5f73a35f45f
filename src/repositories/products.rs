use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::Product;
use crate::db::types::ProductType;

const COLUMNS: &str =
    "id, title, description, price, time_minutes, subject_limit, product_type, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &PgPool,
    product_type: Option<ProductType>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM products"));

    if let Some(product_type) = product_type {
        builder.push(" WHERE product_type = ");
        builder.push_bind(product_type);
    }

    builder.push(" ORDER BY created_at DESC");
    builder.push(" OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<Product>().fetch_all(pool).await
}
