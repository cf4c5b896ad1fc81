pub mod in_memory_gateway;
pub mod remote_gateway;

pub use in_memory_gateway::*;
pub use remote_gateway::*;
