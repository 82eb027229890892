//! Integration tests for the constellation launch engine.
//!
//! Most of these drive the real engine against `support::FakeRuntime`, a
//! `Runtime` backed by real subprocesses rather than a container daemon,
//! so the dependency-ordered launch race (spec.md §4.5) runs end to end
//! without docker. `docker_smoke` is the one exception: it talks to a
//! live docker daemon and is gated behind `#[ignore]`.


mod config_pipeline;
mod docker_smoke;
mod launch_scenarios;
mod network_config;
