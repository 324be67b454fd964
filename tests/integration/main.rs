//! Integration tests for netledger.

mod util;

mod arg_tests;
mod command_tests;
mod invalid_config_tests;
