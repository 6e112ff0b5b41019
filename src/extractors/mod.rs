// src/extractors/mod.rs
pub mod amendment;
pub mod table_diff;
pub mod tags;

// Re-export key extraction types for convenience
pub use amendment::{Amendment, AmendmentExtractor, ParseMode, ParsedDocument};
pub use table_diff::{
    collapse_adjacent,
    extract_additions,
    extract_deletions,
    extract_table_fields,
    ChangeSummary,
    DiffKind,
    TableFields,
};
pub use tags::{parse_tags, TagMap, TagValue};
