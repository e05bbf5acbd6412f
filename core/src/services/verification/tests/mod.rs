//! Tests for the verification session tracker and the contact verification services

mod mocks;
