//! Suspend Doctor: diagnose why an Android device fails to suspend.
//!
//! Pulls `suspend_stats`, the suspend-control wakelock dump and the kernel
//! log from a device over adb (or reads them from a previous capture), runs
//! an ordered three-step rule check over them and writes a Markdown and HTML
//! report. An LLM narrative can be appended to the report.
//!
//! See `DESIGN.md` for the module map.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analyzer;
pub mod collector;
pub mod config;
pub mod logging;
pub mod narrative;
pub mod providers;
pub mod report;
