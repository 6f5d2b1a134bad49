//! Layout sizing engine
//!
//! For one concrete configuration, sweeps the split of the hash score
//! between head bits (which select a bucket) and entry bits (which
//! disambiguate within a bucket's chain), computing the memory footprint
//! and expected collisions of every split and keeping the ones that pass
//! the configured ceilings.
//!
//! The sizing formulas carry several empirical constants (the 0.9
//! rounding bias, the 0.5 chain slack, the 9-byte head record, the 8-bit
//! entry overhead). Their values and the evaluation order are load-bearing:
//! rounding before vs. after summation changes results at integer
//! boundaries. Do not reorder the arithmetic.

use crate::error::{CalcError, Result};
use crate::product::{Binding, Bindings};
use crate::range::ParamName;
use serde::Serialize;

/// Per-head bookkeeping bytes in the index structure.
pub const CHAIN_SIZE: u64 = 9;

/// Fixed per-entry overhead bits alongside score and address.
const ENTRY_OVERHEAD_BITS: u64 = 8;

/// One concrete configuration: a single point of the parameter product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    #[serde(rename = "maxdatafile")]
    pub max_data_file: u64,
    #[serde(rename = "blocksize")]
    pub block_size: u64,
    #[serde(rename = "collisioninterval")]
    pub collision_interval: u64,
    #[serde(rename = "minchainentries")]
    pub min_chain_entries: u64,
    #[serde(rename = "maxinitmem")]
    pub max_init_mem: Option<u64>,
    #[serde(rename = "maxtotalmem")]
    pub max_total_mem: Option<u64>,
    #[serde(rename = "minmaxblocksperhead")]
    pub min_max_blocks_per_head: Option<(u64, u64)>,
}

impl Config {
    /// Build a typed configuration from one product point.
    ///
    /// The product generator guarantees the shapes below; anything else
    /// is a range-compiler bug surfaced as [`CalcError::Internal`].
    pub fn from_bindings(bindings: &Bindings) -> Result<Self> {
        fn scalar(bindings: &Bindings, name: ParamName) -> Result<u64> {
            match bindings.get(&name) {
                Some(Binding::Scalar(v)) => Ok(*v),
                other => Err(CalcError::Internal(format!(
                    "{name}: expected scalar binding, got {other:?}"
                ))),
            }
        }
        fn optional_scalar(bindings: &Bindings, name: ParamName) -> Result<Option<u64>> {
            match bindings.get(&name) {
                Some(Binding::Scalar(v)) => Ok(Some(*v)),
                Some(Binding::Unset) | None => Ok(None),
                other => Err(CalcError::Internal(format!(
                    "{name}: expected scalar or unset binding, got {other:?}"
                ))),
            }
        }
        fn optional_interval(bindings: &Bindings, name: ParamName) -> Result<Option<(u64, u64)>> {
            match bindings.get(&name) {
                Some(Binding::Interval(low, high)) => Ok(Some((*low, *high))),
                Some(Binding::Unset) | None => Ok(None),
                other => Err(CalcError::Internal(format!(
                    "{name}: expected interval or unset binding, got {other:?}"
                ))),
            }
        }

        Ok(Config {
            max_data_file: scalar(bindings, ParamName::MaxDataFile)?,
            block_size: scalar(bindings, ParamName::BlockSize)?,
            collision_interval: scalar(bindings, ParamName::CollisionInterval)?,
            min_chain_entries: scalar(bindings, ParamName::MinChainEntries)?,
            max_init_mem: optional_scalar(bindings, ParamName::MaxInitMem)?,
            max_total_mem: optional_scalar(bindings, ParamName::MaxTotalMem)?,
            min_max_blocks_per_head: optional_interval(bindings, ParamName::MinMaxBlocksPerHead)?,
        })
    }
}

/// One sized layout that passed all active constraints.
///
/// Memory fields are bytes; width fields are bits. `max_mem_used` doubles
/// as the report sort key.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub config: Config,
    #[serde(rename = "totalblocks")]
    pub total_blocks: u64,
    #[serde(rename = "addrwidth")]
    pub addr_width: u32,
    #[serde(rename = "totalscorewidth")]
    pub total_score_width: u32,
    #[serde(rename = "headscorewidth")]
    pub head_score_width: u32,
    #[serde(rename = "entryscorewidth")]
    pub entry_score_width: u32,
    #[serde(rename = "headcount")]
    pub head_count: u64,
    #[serde(rename = "blocksperhead")]
    pub blocks_per_head: u64,
    #[serde(rename = "entrywidth")]
    pub entry_width: u64,
    #[serde(rename = "chaindatasize")]
    pub chain_data_bytes: u64,
    #[serde(rename = "minmemused")]
    pub min_mem_used: u64,
    #[serde(rename = "maxmemused")]
    pub max_mem_used: u64,
    #[serde(rename = "unusedmem")]
    pub unused_mem: u64,
    pub collisions: u64,
    #[serde(rename = "memperblock")]
    pub mem_per_block: f64,
}

impl Layout {
    /// Report ordering key: worst-case memory across heads and chains.
    pub fn sort_key(&self) -> u64 {
        self.max_mem_used
    }
}

/// Round to one decimal place, ties away from zero.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Expected first-order collisions for `n` blocks hashed into
/// `2^score_width` score values: the birthday approximation
/// `n - d + d*((d-1)/d)^n`.
///
/// Second-order and further collisions along a chain are deliberately not
/// modeled; the estimate is a documented approximation.
pub fn expected_collisions(total_blocks: u64, score_width: u32) -> u64 {
    let n = total_blocks as f64;
    let d = (score_width as f64).exp2();
    (n - d + d * ((d - 1.0) / d).powf(n)).round() as u64
}

/// Sweep every head/entry score split for one configuration.
///
/// Returns the layouts that pass all active ceilings, in increasing
/// head-width order. Zero surviving splits is not an error; the
/// configuration simply contributes nothing.
pub fn sweep(config: &Config) -> Vec<Layout> {
    if config.block_size == 0 || config.collision_interval == 0 {
        tracing::debug!("degenerate configuration, nothing to size");
        return Vec::new();
    }
    let total_blocks = config.max_data_file / config.block_size;
    if total_blocks == 0 {
        tracing::debug!("block size exceeds data file size, nothing to size");
        return Vec::new();
    }
    let addr_width = (0.9 + round1((config.max_data_file as f64).log2())) as u32;
    let total_score_width = (0.9 + (total_blocks as f64).log2()) as u32
        + (0.9 + round1((1.0 / config.collision_interval as f64).log2().abs())) as u32;

    let collisions = expected_collisions(total_blocks, total_score_width);

    let mut layouts = Vec::new();
    for head_score_width in 1..=total_score_width {
        // both score fields must carry at least one bit
        if head_score_width >= total_score_width {
            continue;
        }
        let entry_score_width = total_score_width - head_score_width;

        let Some(head_count) = 1u64.checked_shl(head_score_width) else {
            break;
        };
        let min_mem_used = head_count.saturating_mul(CHAIN_SIZE);

        let entry_width = entry_score_width as u64 + addr_width as u64 + ENTRY_OVERHEAD_BITS;
        let chain_data_bytes = (entry_width * config.min_chain_entries + 7) / 8;
        let head_unused = (1.0 + (CHAIN_SIZE + chain_data_bytes) as f64 / 2.0) as u64;
        let blocks_per_head = (1.0 + total_blocks as f64 / head_count as f64) as u64;
        let chains_per_head =
            (1.0 + blocks_per_head as f64 / config.min_chain_entries as f64) as u64;
        let max_mem_used = (min_mem_used as f64
            + head_count as f64
                * (0.5 + chains_per_head as f64)
                * (CHAIN_SIZE + chain_data_bytes) as f64) as u64;
        let mem_per_block = max_mem_used as f64 / total_blocks as f64;

        if config.max_init_mem.is_some_and(|limit| min_mem_used > limit) {
            continue;
        }
        if config.max_total_mem.is_some_and(|limit| max_mem_used > limit) {
            continue;
        }
        if let Some((low, high)) = config.min_max_blocks_per_head {
            if blocks_per_head < low || blocks_per_head > high {
                continue;
            }
        }

        layouts.push(Layout {
            config: config.clone(),
            total_blocks,
            addr_width,
            total_score_width,
            head_score_width,
            entry_score_width,
            head_count,
            blocks_per_head,
            entry_width,
            chain_data_bytes,
            min_mem_used,
            max_mem_used,
            unused_mem: head_count.saturating_mul(head_unused),
            collisions,
            mem_per_block,
        });
    }

    tracing::debug!(
        total_blocks,
        total_score_width,
        kept = layouts.len(),
        "sized configuration"
    );
    layouts
}
