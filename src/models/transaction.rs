use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub book_id: String,
    pub borrower_name: String,
    pub transaction_type: String, // 'borrow', 'return'
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Borrow,
    Return,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Borrow => "borrow",
            TransactionType::Return => "return",
        }
    }

    /// Change applied to the book's available copies
    pub fn copies_delta(&self) -> i32 {
        match self {
            TransactionType::Borrow => -1,
            TransactionType::Return => 1,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "borrow" => Ok(TransactionType::Borrow),
            "return" => Ok(TransactionType::Return),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub book_id: String,
    pub borrower_name: String,
    pub transaction_type: TransactionType,
    pub created_at: String,
}

impl TryFrom<Model> for Transaction {
    type Error = String;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            transaction_type: model.transaction_type.parse()?,
            id: model.id,
            book_id: model.book_id,
            borrower_name: model.borrower_name,
            created_at: model.created_at,
        })
    }
}
