//! Syndication record types
//!
//! - [`syndication_out`]: links pushing a local blog to a remote consumer
//! - [`syndication_in`]: links receiving a remote producer's blog

pub mod macros;
pub mod syndication_in;
pub mod syndication_out;

pub use syndication_in::{
    NewSyndicationIn, SYNDICATION_IN_SCHEMA, SyndicationIn, SyndicationInService,
    syndication_in_service,
};
pub use syndication_out::{
    AssignToken, NewSyndicationOut, SYNDICATION_OUT_SCHEMA, SyndicationOut,
    SyndicationOutService, syndication_out_service,
};
