//! Sitegraph Resolver Library
//!
//! Turns a loaded content graph into the static paths and per-path props a
//! static site renders from.
//!
//! # Modules
//!
//! - [`style`] - Style descriptors to utility class names
//! - [`collection`] - Post feeds and pagination windows
//! - [`references`] - Id reference materialization
//! - [`traverse`] - Post-order payload traversal
//! - [`paths`] - Static path enumeration
//! - [`props`] - Static props resolution
//! - [`annotations`] - Visual-editing data attributes
//! - [`layout`] - Render plans
//! - [`build`] - Build orchestration

pub mod annotations;
pub mod build;
pub mod collection;
pub mod error;
pub mod layout;
pub mod paths;
pub mod props;
pub mod references;
pub mod style;
pub mod traverse;

pub use build::{BuildError, BuildStats, Builder};
pub use error::{ResolveError, Result};
pub use layout::{BaseLayout, RenderPlan, plan_page};
pub use paths::resolve_static_paths;
pub use props::{StaticProps, resolve_static_props};
pub use references::resolve_references;
pub use style::{combine_styles, map_styles};
