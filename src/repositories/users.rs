use sqlx::PgPool;

use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str = "\
    id, iin, email, hashed_password, first_name, last_name, school, \
    phone_number, balance, role, is_active, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_iin(pool: &PgPool, iin: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE iin = $1"))
        .bind(iin)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_iin(pool: &PgPool, iin: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE iin = $1")
        .bind(iin)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub id: &'a str,
    pub iin: &'a str,
    pub email: &'a str,
    pub hashed_password: String,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub school: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub balance: i64,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (
            id, iin, email, hashed_password, first_name, last_name, school,
            phone_number, balance, role, is_active, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.iin)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.school)
    .bind(params.phone_number)
    .bind(params.balance)
    .bind(params.role)
    .bind(params.is_active)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub school: Option<String>,
    pub phone_number: Option<String>,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update_profile(
    pool: &PgPool,
    id: &str,
    params: UpdateProfile,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET
            first_name = COALESCE($1, first_name),
            last_name = COALESCE($2, last_name),
            email = COALESCE($3, email),
            school = COALESCE($4, school),
            phone_number = COALESCE($5, phone_number),
            updated_at = $6
         WHERE id = $7",
    )
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.email)
    .bind(params.school)
    .bind(params.phone_number)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Single-statement credit; returns the new balance when the user exists.
pub(crate) async fn credit_balance(
    pool: &PgPool,
    id: &str,
    amount: i64,
    updated_at: time::PrimitiveDateTime,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "UPDATE users SET balance = balance + $2, updated_at = $3
         WHERE id = $1
         RETURNING balance",
    )
    .bind(id)
    .bind(amount)
    .bind(updated_at)
    .fetch_optional(pool)
    .await
}

/// Conditional debit: only fires when the balance covers the amount, so a
/// concurrent debit can never take the balance negative. Returns false when
/// the predicate did not hold.
pub(crate) async fn debit_balance_if_sufficient(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    amount: i64,
    updated_at: time::PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET balance = balance - $2, updated_at = $3
         WHERE id = $1 AND balance >= $2",
    )
    .bind(id)
    .bind(amount)
    .bind(updated_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}
