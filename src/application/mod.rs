//! Application layer - Use cases over the domain
//!
//! Services orchestrate domain logic and talk to the outside world only
//! through the outbound ports. DTOs define the API shapes.

pub mod dto;
pub mod ports;
pub mod services;
