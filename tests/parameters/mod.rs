// Tests for the parameter system

mod state_tests;
