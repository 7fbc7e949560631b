//! `SeaORM` Entity for users table

use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};

/// Account role, fixed at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "data_entry")]
    DataEntry,
    #[sea_orm(string_value = "read_only_l1")]
    ReadOnlyL1,
    #[sea_orm(string_value = "read_only_l2")]
    ReadOnlyL2,
    #[sea_orm(string_value = "read_only_l3")]
    ReadOnlyL3,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// External identifier (employee/CPF number) used as the login id
    #[sea_orm(unique)]
    pub cpf_no: String,
    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_type: Role,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Role {
    /// Wire strings of every role, in declaration order
    pub fn labels() -> Vec<String> {
        Role::iter().map(|role| role.to_value()).collect()
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::iter()
            .find(|role| role.to_value() == s)
            .ok_or_else(|| format!("Unknown user type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_wire_string() {
        for role in Role::iter() {
            assert_eq!(role.to_value().parse::<Role>().unwrap(), role);
        }
        assert_eq!(Role::labels().len(), 5);
        assert!("Admin".parse::<Role>().is_err());
    }
}
