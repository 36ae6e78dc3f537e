//! Gateway configuration.
//!
//! A single `wagate.toml` describes the credential store, the media upload
//! root, the client identity presented to the chat network, and the inbound
//! webhook. Discovery checks the working directory first, then
//! `~/.config/wagate/`. String values support `${VAR}` and `${VAR:-default}`
//! environment substitution.

mod env_subst;
mod loader;
mod schema;

pub use env_subst::substitute_env;
pub use loader::{config_dir, discover_and_load, load_config};
pub use schema::{ClientConfig, HookConfig, ServerConfig, WagateConfig};
