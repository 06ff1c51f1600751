pub mod json_store;
pub mod memory;
pub mod traits;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::Store;
