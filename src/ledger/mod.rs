// Module declarations
pub(crate) mod ledger_model;
pub(crate) mod ledger_repository;

// Re-export the public interface
pub use ledger_model::{
    EntryType, LedgerEntry, LedgerEntryDB, NewLedgerEntry, LEDGER_STATUS_COMPLETED,
};
pub use ledger_repository::{LedgerRepository, LedgerRepositoryTrait};
