/// Integration test suite entry point
mod basic_integration;
mod streak_workflow;
