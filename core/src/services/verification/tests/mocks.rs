//! Mock implementations for testing verification services

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::value_objects::channel::ChannelKind;
use crate::services::verification::traits::AuthProviderTrait;

/// Code every mock delivery uses unless overridden
pub const MOCK_CODE: &str = "123456";

// Mock auth provider for testing
pub struct MockAuthProvider {
    pub sent_codes: Arc<Mutex<HashMap<String, String>>>,
    pub send_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub should_fail: AtomicBool,
}

impl MockAuthProvider {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent_codes: Arc::new(Mutex::new(HashMap::new())),
            send_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            should_fail: AtomicBool::new(should_fail),
        }
    }

    pub fn set_failing(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn get_sent_code(&self, contact: &str) -> Option<String> {
        self.sent_codes.lock().unwrap().get(contact).cloned()
    }

    pub fn send_count(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn verify_count(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProviderTrait for MockAuthProvider {
    async fn send_code(&self, channel: ChannelKind, contact: &str) -> Result<String, String> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("Auth provider error".to_string());
        }
        self.sent_codes
            .lock()
            .unwrap()
            .insert(contact.to_string(), MOCK_CODE.to_string());
        Ok(format!("mock-{}-{}", channel, uuid::Uuid::new_v4()))
    }

    async fn verify_code(
        &self,
        _channel: ChannelKind,
        contact: &str,
        code: &str,
    ) -> Result<bool, String> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("Auth provider error".to_string());
        }
        Ok(self
            .sent_codes
            .lock()
            .unwrap()
            .get(contact)
            .is_some_and(|sent| sent == code))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
