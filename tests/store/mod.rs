//! Listing and inspection scenarios driven by an in-memory store.

mod bdd_steps;
mod scenarios;
mod test_helpers;
