// Tests for MINOS errors and profile confidence intervals

mod confidence_intervals_tests;
mod minos_tests;
