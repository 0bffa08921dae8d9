//! Use-case services consumed by front ends.

pub mod task_service;
