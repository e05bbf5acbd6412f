//! End-to-end verification flows through the composition root
//! with the mock auth provider and a manual clock.

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use mr_core::domain::value_objects::ChannelKind;
use mr_core::services::{ContactRequirements, ManualClock, RequestCodeOutcome, VerifyFailure};
use mr_core::DomainError;
use mr_infra::{MockAuthProvider, VerificationServices};
use mr_shared::config::AppConfig;

const EMAIL: &str = "doctor@example.com";
const PHONE: &str = "+491712345678";

fn setup(config: AppConfig) -> (Arc<ManualClock>, Arc<MockAuthProvider>, VerificationServices) {
    mr_shared::init_logging(&config.logging);
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap()));
    let provider = Arc::new(MockAuthProvider::new());
    let services = VerificationServices::new(&config, provider.clone(), clock.clone());
    (clock, provider, services)
}

#[tokio::test]
async fn test_registration_requires_both_contacts() {
    let (_, provider, services) = setup(AppConfig::development());
    let mut contacts = services.registration_contacts();
    contacts.set_email(" Doctor@Example.com");
    contacts.set_phone("+49 171 2345678");

    services.email.request_code(contacts.email()).await.unwrap();
    let code = provider.last_code(ChannelKind::Email, EMAIL).unwrap();
    assert!(services.email.submit_code(EMAIL, &code).await.unwrap().success);

    assert_eq!(
        contacts.missing_verifications(&ContactRequirements::all()),
        vec![ChannelKind::Phone]
    );

    services.phone.request_code(contacts.phone()).await.unwrap();
    let code = provider.last_code(ChannelKind::Phone, PHONE).unwrap();
    assert!(services.phone.submit_code(PHONE, &code).await.unwrap().success);

    assert!(contacts.can_proceed(&ContactRequirements::all()));
}

#[tokio::test]
async fn test_verification_expires_without_keep_alive() {
    let (clock, provider, services) = setup(AppConfig::development());
    let mut contacts = services.registration_contacts();
    contacts.set_email(EMAIL);

    services.email.request_code(EMAIL).await.unwrap();
    let code = provider.last_code(ChannelKind::Email, EMAIL).unwrap();
    services.email.submit_code(EMAIL, &code).await.unwrap();
    assert!(contacts.is_email_verified());

    clock.advance(Duration::seconds(601));
    assert!(!contacts.is_email_verified());

    // A new code is needed once the verification lapsed
    let outcome = services.email.request_code(EMAIL).await.unwrap();
    assert!(matches!(outcome, RequestCodeOutcome::CodeSent { .. }));
}

#[tokio::test]
async fn test_keep_alive_while_form_is_open() {
    let (clock, provider, services) = setup(AppConfig::development());
    let mut contacts = services.registration_contacts();
    contacts.set_phone(PHONE);

    services.phone.request_code(PHONE).await.unwrap();
    let code = provider.last_code(ChannelKind::Phone, PHONE).unwrap();
    services.phone.submit_code(PHONE, &code).await.unwrap();

    for _ in 0..5 {
        clock.advance(Duration::seconds(300));
        contacts.keep_alive();
    }
    assert!(contacts.is_phone_verified());
}

#[tokio::test]
async fn test_wrong_codes_then_resend() {
    let (clock, provider, services) = setup(AppConfig::development());

    services.phone.request_code(PHONE).await.unwrap();
    let issued = provider.last_code(ChannelKind::Phone, PHONE).unwrap();
    let wrong = if issued == "000000" { "111111" } else { "000000" };

    for _ in 0..3 {
        services.phone.submit_code(PHONE, wrong).await.unwrap();
    }
    let result = services.phone.submit_code(PHONE, &issued).await.unwrap();
    assert_eq!(result.failure, Some(VerifyFailure::MaxAttemptsExceeded));

    match services.phone.request_code(PHONE).await {
        Err(DomainError::RateLimited { retry_after_seconds }) => assert!(retry_after_seconds > 0),
        other => panic!("Expected rate limit, got {:?}", other),
    }

    clock.advance(Duration::seconds(60));
    services.phone.request_code(PHONE).await.unwrap();
    let code = provider.last_code(ChannelKind::Phone, PHONE).unwrap();
    assert!(services.phone.submit_code(PHONE, &code).await.unwrap().success);
    assert!(services.phone.is_verified(PHONE));
}

#[tokio::test]
async fn test_email_and_phone_stores_are_separate() {
    let (_, _, services) = setup(AppConfig::development());

    services.email.confirm_link(EMAIL).unwrap();

    assert!(services.email_store.is_verified(EMAIL));
    assert!(!services.phone_store.is_verified(EMAIL));
    assert!(services.phone_store.is_empty());
}

#[tokio::test]
async fn test_auto_phone_verification_is_config_gated() {
    let mut config = AppConfig::development();
    config.verification.auto_verify_phone = true;
    let (_, provider, services) = setup(config);

    services.phone.auto_verify(PHONE).unwrap();
    assert!(services.phone.is_verified(PHONE));
    assert_eq!(provider.sent_count(), 0);

    assert!(matches!(
        services.email.auto_verify(EMAIL),
        Err(DomainError::BusinessRule { .. })
    ));
}

#[tokio::test]
async fn test_provider_outage_leaves_no_session() {
    let (_, provider, services) = setup(AppConfig::development());
    provider.set_simulate_failure(true);

    let err = services.email.request_code(EMAIL).await.unwrap_err();
    assert_eq!(err.code(), "AUTH_PROVIDER_FAILURE");
    assert!(!services.email.has_active_session(EMAIL));

    provider.set_simulate_failure(false);
    services.email.request_code(EMAIL).await.unwrap();
    assert!(services.email.has_active_session(EMAIL));
}
