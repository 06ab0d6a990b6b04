pub mod constants;
pub mod types;
pub mod validation;

pub use constants::{CREATION_FAILED_MESSAGE, DEFAULT_API_BASE_URL, DEVICE_ID_KEY};
pub use types::{CreateIdentityRequest, DeviceId, ErrorBody, IdentityRecord};
pub use validation::{
    creation_failure_message, parse_exists_flag, parse_identity_record, validate_identity_record,
};
