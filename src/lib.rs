//! Rebuilds structured playlists (show title, air date, description and
//! artist/song pairs) from free-form show notes and archived article pages.
//!
//! The pipeline is `RawDocument` → [`parser`] → [`assemble`] → [`store`],
//! with [`audit`] reading the stored archive back.

pub mod assemble;
pub mod audit;
pub mod config;
pub mod error;
pub mod fetch;
pub mod html;
pub mod model;
pub mod parser;
pub mod store;
