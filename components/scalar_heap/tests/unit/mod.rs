//! Unit tests for the scalar heap, driven through the interpreter contract.

mod refcount_test;
mod conversion_test;
mod magic_test;
