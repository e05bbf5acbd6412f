//! Business services containing domain logic and use cases.

pub mod clock;
pub mod registration;
pub mod verification;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use registration::{ContactRequirements, RegistrationContacts};
pub use verification::{
    AuthProviderTrait, ContactVerificationService, EmailSessionStore, EmailVerificationService,
    PhoneSessionStore, PhoneVerificationService, RequestCodeOutcome, VerificationServiceConfig,
    VerificationSessionStore, VerifyCodeResult, VerifyFailure,
};
