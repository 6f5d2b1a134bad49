//! # chaincalc - head/chain hash-index sizing explorer
//!
//! `chaincalc` explores the design space of the in-memory index of a
//! content-addressed, chained-hash block store: a head/chain hash table
//! mapping content fingerprints to storage locations. Given ranges for
//! the structural parameters (data-file size, block size, acceptable
//! collision interval, optional memory ceilings), it enumerates every
//! combination, sweeps the head/entry split of the hash score for each,
//! and reports every layout that fits the constraints, sorted by total
//! memory used.
//!
//! It sizes an index; it never builds one. The computation is pure,
//! single-threaded, and deterministic: identical inputs always reproduce
//! identical output ordering.
//!
//! ## Quick start
//!
//! ```rust
//! use chaincalc::{explore, Schema};
//!
//! # fn main() -> chaincalc::Result<()> {
//! let schema = Schema::block_store();
//! let layouts = explore(
//!     &schema,
//!     &[
//!         ("maxdatafile", "1g-4g"),
//!         ("blocksize", "4k"),
//!         ("collisioninterval", "1000"),
//!     ],
//! )?;
//!
//! // ascending by worst-case memory; pick the first that fits
//! let best = &layouts[0];
//! println!("{} heads, {} max", best.head_count, best.max_mem_used);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! Four stages, composed strictly forward:
//!
//! 1. [`range`] compiles each specification string into a finite domain.
//! 2. [`product`] expands the domains into the Cartesian product of
//!    concrete configurations.
//! 3. [`sizing`] sweeps the score split per configuration and filters.
//! 4. [`report`] sorts the surviving layouts and renders them.

pub mod error;
pub mod product;
pub mod range;
pub mod report;
pub mod sizing;
pub mod suffix;

pub use crate::error::{CalcError, ParseIssue, Result};
pub use crate::range::{compile, Domain, DomainMap, ParamKind, ParamName, Schema};
pub use crate::sizing::{sweep, Config, Layout};

use tracing::info;

/// Run the whole pipeline: compile, expand, sweep, sort.
///
/// `pairs` maps parameter names to their specification strings, exactly
/// as an argument parser hands them over. Returns the surviving layouts
/// ascending by worst-case memory, or the first compilation error.
pub fn explore(schema: &Schema, pairs: &[(&str, &str)]) -> Result<Vec<Layout>> {
    let domains = range::compile(schema, pairs)?;
    let configs = product::expand(&domains);
    info!("exploring {} configurations", configs.len());

    let mut layouts = Vec::new();
    for bindings in &configs {
        let config = Config::from_bindings(bindings)?;
        layouts.extend(sizing::sweep(&config));
    }
    info!("{} layouts satisfy all constraints", layouts.len());

    Ok(report::sort_candidates(layouts))
}
