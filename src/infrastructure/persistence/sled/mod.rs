//! Sled Storage

mod credential_store;

pub use credential_store::{SledCredentialStore, SledCredentialStoreConfig};
