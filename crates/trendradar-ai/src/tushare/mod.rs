//! Tushare Pro financial data tools
//!
//! Eight functions over the Tushare Pro API, offered to the model through
//! `tushare_tools()` and answered by `TushareToolExecutor`:
//!
//! | Function | Tushare API | Rows |
//! |----------|-------------|------|
//! | `get_concept_sector_daily` | `ths_daily` | 20 |
//! | `get_concept_sector_members` | `ths_member` | all |
//! | `get_index_daily` | `index_daily` | 10 |
//! | `get_stock_daily_basic` | `daily_basic` | 5 |
//! | `get_stock_daily` | `daily` | 10 |
//! | `get_limit_list` | `limit_list_d` | 50 |
//! | `get_top_list` | `top_list` | 30 |
//! | `get_moneyflow` | `moneyflow` | 5 |

mod error;
mod source;
mod schema;
mod format;
mod executor;

pub use error::{TushareError, TushareResult};
pub use source::{Frame, HttpQuerySource, QuerySource, Row, DEFAULT_ENDPOINT};
pub use schema::{tushare_tools, TushareFunction};
pub use format::{fmt, fmt_amount, fmt_mv, fmt_num, limit_label};
pub use executor::TushareToolExecutor;
