//! Tradespace aggregation pipeline.
//!
//! Per configuration file: [`metadata`] → [`outage`] → [`confidence`], folded over all files by
//! [`assembler`]. The resulting wide table is reshaped by [`reshape`], priced by [`capex`] and
//! cut down to the cheapest configurations per solar tier by [`shortlist`].

pub mod assembler;
pub mod capex;
pub mod confidence;
mod error;
pub mod metadata;
pub mod outage;
pub mod reshape;
pub mod shortlist;

pub use self::error::TradespaceError;
