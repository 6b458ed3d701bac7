//! Row generation and scoring
//!
//! A [`SelectionSet`] over an ordered list of computed matches is expanded
//! by the [`RowGenerator`] into scored [`Row`](crate::common::types::Row)s.
//! Up to [`MAX_ROWS`] combinations are enumerated in odometer order; larger
//! spaces are sampled without repeats.

pub mod generator;
pub mod scorer;
pub mod selection;

pub use generator::{generate_rows, GeneratedRows, GenerationMode, GeneratorOptions, RowGenerator, MAX_ROWS};
pub use scorer::{build_row, score, score_picks, value_index, RowScore};
pub use selection::SelectionSet;
