//! Record parsing for trowel.
//!
//! - [`RecordParser`] - Paginated API items to canonical records
//! - [`BoardParser`] - Rendered board rows to canonical records

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod coerce;
mod record;

pub use board::BoardParser;
pub use coerce::{coerce_board_price, coerce_date, coerce_price};
pub use record::{RecordParser, SELL_PRICE_KEYS};
