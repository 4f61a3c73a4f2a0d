//! 惰性求值的链式流处理库。
//!
//! [`Stream`]包装一个可以重复调用的数据源，中间操作（`map`、`filter`、`group`等）只组合新的流，
//! 直到调用终止操作（`to`、`sum`、`join`、`to_csv`等）时才真正从数据源拉取数据。
//!
//! ```ignore
//! use rstream::Stream;
//!
//! let sum = Stream::of([1, 1, 4, 5, 1, 4]).unique().map(|x| x * x).filter(|x| x % 2 == 1).sum()?;
//! assert_eq!(sum, 26);
//! ```

mod config;
mod csv;
mod err;
mod op;
mod print;
mod source;
mod starmap;
mod stream;
mod terminal;

pub use config::{CsvConfig, Header};
pub use csv::{Fields, FromField, FromRecord, Skip, ToRecord};
pub use err::StreamErr;
pub use starmap::Unpack;
pub use stream::Stream;

/// 整数类型
pub type Integer = i64;

pub type StreamRes<T> = Result<T, StreamErr>;

/// 单次遍历产生的迭代器，错误作为元素向下游传递，由终止操作返回。
pub type Iter<T> = Box<dyn Iterator<Item = StreamRes<T>>>;
