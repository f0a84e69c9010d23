//! Persistence for the pharmit query panel: versioned session documents,
//! the file session store, catalog configuration and platform paths.

pub mod catalog_store;
pub mod codec;
pub mod dto;
pub mod file_session_repository;
pub mod paths;

pub use catalog_store::CatalogStore;
pub use codec::VersionedSessionCodec;
pub use file_session_repository::FileSessionRepository;
pub use paths::PharmitPaths;
