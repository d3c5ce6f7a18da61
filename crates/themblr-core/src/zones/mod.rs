//! Zone extraction, composition and locked-zone repair
//!
//! The starter template is a controlled asset with a known shape, so zones are
//! located with fixed anchors rather than an HTML parser. Every operation works
//! on the serialized document and returns a new string; the base template is
//! never mutated.

pub mod compose;
pub mod extract;
pub mod policy;
pub mod repair;

pub use compose::{apply_meta_defaults, compose_template, ComposeResult, Composer};
pub use extract::{
    extract_css_core_lenient, extract_locked_zones, extract_locked_zones_lenient, extract_zones,
    EditableZoneSnapshot, LockedZoneSnapshot, ZoneExtraction,
};
pub use policy::{
    build_css_contract_backfill, detect_missing_css_contracts, missing_css_variables,
    missing_stable_hooks, CssMergePolicy, MissingCssContracts, ThresholdMergePolicy,
};
pub use repair::{repair_locked_zones, RepairResult};
