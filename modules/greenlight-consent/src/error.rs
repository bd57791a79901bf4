use thiserror::Error;

/// Decode failures are expected and normal — many unrelated events pass
/// through the same channel. Callers treat them as "ignore the event".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload is not a consent payload")]
    NotConsentPayload,
}
