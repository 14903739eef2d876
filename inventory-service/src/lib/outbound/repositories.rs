pub mod accounts;
pub mod inventory;
pub mod memory;
pub mod tokens;

pub use accounts::PostgresCredentialStore;
pub use inventory::PostgresInventoryRepository;
pub use memory::InMemoryCredentialStore;
pub use memory::InMemoryInventoryRepository;
pub use memory::InMemoryTokenStore;
pub use tokens::PostgresTokenStore;
