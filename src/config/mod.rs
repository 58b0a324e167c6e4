//! JSON configuration files consumed by the command-line tool.

pub mod finder;
