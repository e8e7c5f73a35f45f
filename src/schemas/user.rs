use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UserCreate {
    pub(crate) iin: String,
    #[validate(email)]
    pub(crate) email: String,
    pub(crate) password: String,
    #[serde(alias = "firstName")]
    pub(crate) first_name: String,
    #[serde(alias = "lastName")]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) school: Option<String>,
    #[serde(default)]
    #[serde(alias = "phoneNumber")]
    pub(crate) phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserLogin {
    pub(crate) iin: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProfileUpdate {
    #[serde(default)]
    #[serde(alias = "firstName")]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "lastName")]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) school: Option<String>,
    #[serde(default)]
    #[serde(alias = "phoneNumber")]
    pub(crate) phone_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct BalanceCredit {
    #[validate(range(min = 1))]
    pub(crate) amount: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct BalanceResponse {
    pub(crate) user_id: String,
    pub(crate) balance: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) iin: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) school: Option<String>,
    pub(crate) phone_number: Option<String>,
    pub(crate) balance: i64,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            iin: user.iin,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            school: user.school,
            phone_number: user.phone_number,
            balance: user.balance,
            role: user.role,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
        }
    }
}
