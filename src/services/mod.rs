// Record services - each issues its own calls against the document store,
// scoped by the caller's identity key

pub mod info_service;
pub mod networking_service;
pub mod profile_service;

pub use info_service::InfoService;
pub use networking_service::NetworkingService;
pub use profile_service::ProfileService;
