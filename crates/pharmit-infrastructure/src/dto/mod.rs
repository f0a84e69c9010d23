//! Versioned persistence DTOs.

pub mod session;

pub use session::{
    create_session_document_migrator, FeatureV1_0_0, FeatureV1_1_0, FiltersDTO,
    SessionDocumentDTO, SessionDocumentV1_0_0, SessionDocumentV1_1_0,
};
