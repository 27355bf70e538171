//! Month view calendar for e-paper displays.
//!
//! Events of the current month are fetched from an [`EventSource`], reduced
//! to a per day count by the [`EventCounter`] and drawn by the
//! [`CalendarRenderer`] onto any [`embedded_graphics`] draw target: one
//! number per day, a marker under today and up to
//! [`LayoutConfig::max_events`] dots under every day that has events.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod calendar_utils;
pub mod config;
pub mod draw;
pub mod events;

#[cfg(test)]
mod tests;

pub use config::{CalendarConfig, EventsConfig, LayoutConfig, Palette};
pub use draw::{CalendarRenderer, RenderError};
pub use events::{
    CalendarEvent, CountError, DayCount, EventCounter, EventPage, EventSource, EventTime,
};
