#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpsResult {
    Ok = 0,
    InvalidArgument = 1,
    NotConfigured = 2,
    AlreadyConfigured = 3,
    CodecError = 4,
    OutOfBand = 5,
    SignatureError = 6,
    Internal = 99,
}

#[allow(dead_code)]
pub const SPS_OK: SpsResult = SpsResult::Ok;
#[allow(dead_code)]
pub const SPS_ERR_INVALID_ARGUMENT: SpsResult = SpsResult::InvalidArgument;
#[allow(dead_code)]
pub const SPS_ERR_NOT_CONFIGURED: SpsResult = SpsResult::NotConfigured;
#[allow(dead_code)]
pub const SPS_ERR_ALREADY_CONFIGURED: SpsResult = SpsResult::AlreadyConfigured;
#[allow(dead_code)]
pub const SPS_ERR_CODEC: SpsResult = SpsResult::CodecError;
#[allow(dead_code)]
pub const SPS_ERR_OUT_OF_BAND: SpsResult = SpsResult::OutOfBand;
#[allow(dead_code)]
pub const SPS_ERR_SIGNATURE: SpsResult = SpsResult::SignatureError;
#[allow(dead_code)]
pub const SPS_ERR_INTERNAL: SpsResult = SpsResult::Internal;
