//! Flutter bridge for the contacts read layer.

pub mod api;
