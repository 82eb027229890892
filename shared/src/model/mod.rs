//! In-memory representation of a constellation: containers, volumes,
//! mounts, ports, hosts entries, state conditions, and network config.
//!
//! These are plain data types (mirroring the teacher's `shared::models`
//! split) with no merge/validation/resolution logic attached — that lives
//! in `engine`, which owns the behavior over this data.

pub mod config;
pub mod container;
pub mod network;
pub mod port;
pub mod state_condition;
pub mod volume;

pub use config::Config;
pub use container::{Container, Mount};
pub use network::{Ipam, NetworkConfig, Route};
pub use port::{HostsEntry, Port};
pub use state_condition::{
    ExitCondition, FileMonitorCondition, OutputCondition, OutputSource, StateConditions, Status,
    TimeoutCondition,
};
pub use volume::Volume;
