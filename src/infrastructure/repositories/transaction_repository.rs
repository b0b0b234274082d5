//! SeaORM implementation of TransactionRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::domain::{DomainError, NewTransaction, TransactionRepository};
use crate::models::Transaction;
use crate::models::book::{Column as BookColumn, Entity as BookEntity};
use crate::models::transaction::{ActiveModel, Column, Entity as TransactionEntity};

/// SeaORM-based implementation of TransactionRepository
pub struct SeaOrmTransactionRepository {
    db: DatabaseConnection,
}

impl SeaOrmTransactionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepository for SeaOrmTransactionRepository {
    async fn record(&self, input: NewTransaction) -> Result<Transaction, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let delta = input.transaction_type.copies_delta();

        let txn = self.db.begin().await?;

        // Conditional update keeps the counter from ever going negative.
        let result = BookEntity::update_many()
            .col_expr(
                BookColumn::AvailableCopies,
                Expr::col(BookColumn::AvailableCopies).add(delta),
            )
            .col_expr(BookColumn::UpdatedAt, Expr::value(now.clone()))
            .filter(BookColumn::Id.eq(input.book_id.as_str()))
            .filter(BookColumn::AvailableCopies.gte(-delta))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            let exists = BookEntity::find_by_id(input.book_id.clone())
                .one(&txn)
                .await?
                .is_some();
            txn.rollback().await?;
            return Err(if exists {
                DomainError::Rejected("No copies available to borrow.".to_string())
            } else {
                DomainError::NotFound
            });
        }

        let transaction = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            book_id: Set(input.book_id),
            borrower_name: Set(input.borrower_name),
            transaction_type: Set(input.transaction_type.as_str().to_string()),
            created_at: Set(now),
        };
        let model = transaction.insert(&txn).await?;

        txn.commit().await?;

        Transaction::try_from(model).map_err(DomainError::Database)
    }

    async fn find_all(&self, book_id: Option<String>) -> Result<Vec<Transaction>, DomainError> {
        let mut query = TransactionEntity::find();
        if let Some(book_id) = book_id {
            query = query.filter(Column::BookId.eq(book_id));
        }

        let models = query
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await?;

        models
            .into_iter()
            .map(|m| Transaction::try_from(m).map_err(DomainError::Database))
            .collect()
    }
}
