mod common;
mod evaluation_tests;
mod registry_tests;
