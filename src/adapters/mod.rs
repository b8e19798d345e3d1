pub mod in_memory;
pub mod postgres_transaction_repository;

pub use in_memory::InMemoryTransactionStore;
pub use postgres_transaction_repository::PostgresTransactionStore;
