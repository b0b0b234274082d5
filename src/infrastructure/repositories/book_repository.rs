//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{BookChanges, BookFilter, BookRepository, DomainError, NewBook};
use crate::models::Book;
use crate::models::book::{ActiveModel, Column, Entity as BookEntity};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
        let mut query = BookEntity::find();

        if let Some(q) = &filter.query
            && !q.trim().is_empty()
        {
            let q = q.trim();
            // SQLite LIKE is case-insensitive for ASCII
            let cond = Condition::any()
                .add(Column::Title.contains(q))
                .add(Column::Author.contains(q))
                .add(Column::Isbn.contains(q))
                .add(Column::Genre.contains(q));
            query = query.filter(cond);
        }

        let books = query.order_by_asc(Column::Title).all(&self.db).await?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(book.map(Book::from))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find()
            .filter(Column::Title.eq(title))
            .one(&self.db)
            .await?;
        Ok(book.map(Book::from))
    }

    async fn create(&self, book: NewBook) -> Result<Book, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let fields = book.fields;

        let new_book = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(fields.title),
            author: Set(fields.author),
            isbn: Set(fields.isbn),
            genre: Set(fields.genre),
            available_copies: Set(fields.available_copies),
            image: Set(book.image),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = new_book.insert(&self.db).await?;
        Ok(Book::from(result))
    }

    async fn update(&self, id: &str, changes: BookChanges) -> Result<Option<Book>, DomainError> {
        let Some(existing) = BookEntity::find_by_id(id.to_string()).one(&self.db).await? else {
            return Ok(None);
        };

        let fields = changes.fields;
        let mut active: ActiveModel = existing.into();
        active.title = Set(fields.title);
        active.author = Set(fields.author);
        active.isbn = Set(fields.isbn);
        active.genre = Set(fields.genre);
        active.available_copies = Set(fields.available_copies);
        if let Some(image) = changes.image {
            active.image = Set(Some(image));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(Book::from(model))),
            // Row deleted between the read and the write
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
