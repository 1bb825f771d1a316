//! med-reminder: polls a medication reminder server and raises desktop
//! notifications with an alarm sound. Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
