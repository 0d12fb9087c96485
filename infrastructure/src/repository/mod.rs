//! Escalation record storage adapters.

mod memory;

pub use memory::InMemoryEscalationRepository;
