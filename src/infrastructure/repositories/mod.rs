//! Repository implementations using SeaORM

pub mod book_repository;
pub mod transaction_repository;

pub use book_repository::SeaOrmBookRepository;
pub use transaction_repository::SeaOrmTransactionRepository;
