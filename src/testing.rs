// testing.rs - Shared test messages
//
//! Prost messages used across module tests. Mirrors the shape of the user
//! payload types an application would compile in and register.

use crate::codec;

#[derive(Clone, PartialEq, prost::Message)]
pub struct CounterState {
    #[prost(int32, tag = "1")]
    pub count: i32,
}

impl prost::Name for CounterState {
    const NAME: &'static str = "CounterState";
    const PACKAGE: &'static str = "example";

    fn full_name() -> String {
        "example.CounterState".into()
    }

    fn type_url() -> String {
        "type.googleapis.com/example.CounterState".into()
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IncrementBy {
    #[prost(int32, tag = "1")]
    pub by: i32,
}

impl prost::Name for IncrementBy {
    const NAME: &'static str = "IncrementBy";
    const PACKAGE: &'static str = "example";

    fn full_name() -> String {
        "example.IncrementBy".into()
    }

    fn type_url() -> String {
        "type.googleapis.com/example.IncrementBy".into()
    }
}

/// Register the test payload types with the global codec registry.
/// Idempotent, safe to call from every test.
pub fn register_test_types() {
    codec::register_type::<CounterState>();
    codec::register_type::<IncrementBy>();
}
