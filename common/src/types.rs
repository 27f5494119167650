//! Type definitions shared between the queue and its consumers

pub mod tasks;
