pub mod paths;
pub mod storage;

pub use paths::SmartDocPaths;
pub use storage::{
    ClientConfig, ConfigStorage, CredentialStorage, SessionStorage, StorageError,
};
