/// Base path of the identity service when none is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/identities";

/// Storage key under which the device identifier is persisted
pub const DEVICE_ID_KEY: &str = "deviceId";

/// Shown when a failed creation response carries no usable message
pub const CREATION_FAILED_MESSAGE: &str = "Creation failed";
