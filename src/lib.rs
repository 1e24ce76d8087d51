//! # Pixit Nodes
//!
//! Plugin nodes for node-graph image generation hosts. Each node is a small,
//! independent operation registered into a static table the host discovers at
//! startup:
//!
//! | Id | Display name | Does |
//! |----|--------------|------|
//! | `StringToCombo` | String to Combo | First entry of a comma-separated list |
//! | `SwitchBooleanString` | Switch String | Pick one of two strings from a boolean |
//! | `ImageSave` | Pixit Image Save | Write an image batch with auto-numbered filenames |
//! | `SplitString` | Pixit Split String | Split text into up to four parts |
//! | `CheckTensorAllZeros` | Pixit Check Tensor All Zeros | Test a mask for all-zero values |
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`nodes`] | The [`Node`](nodes::Node) contract, runtime input validation, the five nodes |
//! | [`nodes::registry`] | Process-wide id → node and id → display name tables |
//! | [`value`] | Tagged values and slot types crossing the node boundary |
//! | [`naming`] | `<prefix><delimiter><counter>` filename convention and counter discovery |
//! | [`imaging`] | Tensor → 8-bit conversion, per-format encoding via `image` and `png` |
//! | [`config`] | `pixit.toml` loading, merging, and validation for the CLI |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Shared State
//!
//! Nodes never talk to each other. The host's graph executor owns wiring and
//! execution order; this crate only answers "what are your slots" and "run
//! with these values". The registry is the only static, and it is immutable
//! once built.
//!
//! ## Directory Is The Counter
//!
//! [`ImageSave`](nodes::ImageSave) keeps no counter between calls. Every call
//! rescans the output directory and continues after the highest number it
//! finds. Concurrent saves into one directory are not coordinated and can
//! collide.
//!
//! ## Failures Stay Local
//!
//! A file that fails to encode or write is logged and skipped; the rest of the
//! batch still goes out, and the returned path list says exactly what landed
//! on disk.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod nodes;
pub mod output;
pub mod value;
