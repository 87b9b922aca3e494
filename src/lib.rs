//! Vitrine - interactive two-language portfolio page
//!
//! An in-memory document model with the page's controllers bound to it:
//! an image carousel, a slide-out navigation menu with a focus trap,
//! reveal-on-scroll and scroll-spy observers, and pt/en translations with a
//! persisted preference. A ratatui host renders the page in a terminal.

pub mod carousel;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod dom;
pub mod i18n;
pub mod logging;
pub mod menu;
pub mod observer;
pub mod page;
pub mod storage;
pub mod tui;
