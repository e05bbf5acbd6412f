//! Domain entities representing core business objects.

pub mod code_challenge;
pub mod verification_session;

// Re-export commonly used types
pub use code_challenge::{
    is_well_formed_code, CodeChallenge, CODE_LENGTH, DEFAULT_CODE_EXPIRATION_MINUTES, DEFAULT_RESEND_COOLDOWN_SECONDS,
    MAX_ATTEMPTS,
};
pub use verification_session::{
    SessionState, VerificationMethod, VerificationSession, DEFAULT_SESSION_TTL_MINUTES,
};
