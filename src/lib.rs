pub mod config;
pub mod consts;
pub mod utils;

pub mod error;
pub mod ids;

pub mod calendar;
pub mod attendance;
pub mod advance;
pub mod settlement;
pub mod roster;

pub mod entity;
pub mod store;
pub mod session;
pub mod timers;

pub mod auth;
pub mod pages;
