pub mod transaction;

pub use transaction::{
    AmountError, MinorUnits, Transaction, TransactionStatus, TransactionUpdate,
    MINOR_UNITS_PER_MAJOR,
};
