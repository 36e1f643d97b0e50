/// In-memory reference store used by tests and the default deployment.
pub mod memory;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer error types.
pub mod storage;
/// Persistence boundary trait consumed by the engine.
pub mod store;
