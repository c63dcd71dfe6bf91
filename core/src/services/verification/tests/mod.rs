//! Tests for the verification engine and its collaborator mocks.

mod mocks;
