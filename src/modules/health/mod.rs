//! Operational endpoints under `/actuator`.

pub mod controller;
pub mod router;
