//! Result reporter
//!
//! Orders layout candidates ascending by worst-case memory and renders
//! them. The human rendering scales byte-valued fields with magnitude
//! suffixes; scaling is cosmetic only and never feeds back into the sort,
//! which always compares unscaled values.

use crate::error::Result;
use crate::sizing::Layout;
use crate::suffix::to_suffix;
use std::io::{self, Write};

/// Stable ascending sort by worst-case memory used.
pub fn sort_candidates(mut layouts: Vec<Layout>) -> Vec<Layout> {
    layouts.sort_by_key(Layout::sort_key);
    layouts
}

fn write_optional(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), to_suffix)
}

/// Render the sorted candidate list for a terminal.
pub fn render_text<W: Write>(out: &mut W, layouts: &[Layout]) -> io::Result<()> {
    writeln!(out, "results: {}", layouts.len())?;
    for layout in layouts {
        let config = &layout.config;
        writeln!(
            out,
            "maxdatafile {}  blocksize {}  collisioninterval {}  minchainentries {}",
            to_suffix(config.max_data_file),
            to_suffix(config.block_size),
            config.collision_interval,
            config.min_chain_entries,
        )?;
        if config.max_init_mem.is_some()
            || config.max_total_mem.is_some()
            || config.min_max_blocks_per_head.is_some()
        {
            let window = config
                .min_max_blocks_per_head
                .map_or_else(|| "-".to_string(), |(low, high)| format!("{low}-{high}"));
            writeln!(
                out,
                "  limits: maxinitmem {}  maxtotalmem {}  minmaxblocksperhead {}",
                write_optional(config.max_init_mem),
                write_optional(config.max_total_mem),
                window,
            )?;
        }
        writeln!(
            out,
            "  totalblocks {}  addrwidth {}  scorewidth {} (head {} + entry {})",
            to_suffix(layout.total_blocks),
            layout.addr_width,
            layout.total_score_width,
            layout.head_score_width,
            layout.entry_score_width,
        )?;
        writeln!(
            out,
            "  headcount {}  blocksperhead {}  entrywidth {}  chaindatasize {}",
            to_suffix(layout.head_count),
            to_suffix(layout.blocks_per_head),
            layout.entry_width,
            to_suffix(layout.chain_data_bytes),
        )?;
        writeln!(
            out,
            "  minmemused {}  maxmemused {}  unusedmem {}  collisions {}  memperblock {:.2}",
            to_suffix(layout.min_mem_used),
            to_suffix(layout.max_mem_used),
            to_suffix(layout.unused_mem),
            layout.collisions,
            layout.mem_per_block,
        )?;
    }
    Ok(())
}

/// Render the sorted candidate list as pretty JSON.
pub fn render_json(layouts: &[Layout]) -> Result<String> {
    Ok(serde_json::to_string_pretty(layouts)?)
}
