//! dock-plugin-host - plugin hosting layer of a desktop dock panel
//!
//! This library embeds third-party dock plugins: it classifies each plugin
//! item into presentation slots, embeds its window exactly once per slot,
//! manages popup applets and routes messages between the dock and plugins.
//!
//! # Modules
//!
//! - [`flags`]: Capability flags and slot classification
//! - [`registry`]: Handle-keyed embed and popup wrapper registries
//! - [`plugins`]: Plugin interfaces, lifecycle manager and message router
//! - [`context`]: Dock-wide services shared by all hosted plugins
//! - [`event_loop`]: Deferred task queue for the UI thread
//! - [`signal`]: Signals with subscribe-once connections
//! - [`widget`]: Toolkit seams (widgets, window system, palette)
//! - [`dock`]: Dock enums, reserved keys and ambient state
//! - [`config`]: Configuration management and serialization
//! - [`headless`]: In-memory toolkit backend
//! - [`scenario`]: Scenario replay against the headless backend

pub mod config;
pub mod context;
pub mod dock;
pub mod error;
pub mod event_loop;
pub mod flags;
pub mod geometry;
pub mod headless;
pub mod plugins;
pub mod registry;
pub mod scenario;
pub mod signal;
pub mod widget;
