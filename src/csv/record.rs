use crate::err::StreamErr;
use crate::StreamRes;
use std::fmt::Display;
use std::rc::Rc;
use std::str::FromStr;

/// 单个字段的转换器。
///
/// 所有实现了`FromStr`的类型都可以直接作为列类型，`String`原样保留字段，[`Skip`]丢弃字段。
pub trait FromField: Sized {
    fn from_field(field: &str) -> Result<Self, String>;
}

impl<T> FromField for T
where
    T: FromStr,
    T::Err: Display,
{
    fn from_field(field: &str) -> Result<Self, String> {
        field.parse().map_err(|err: T::Err| err.to_string())
    }
}

/// 占位列类型，读取时不做任何转换。
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Skip;

impl FromField for Skip {
    fn from_field(_: &str) -> Result<Self, String> {
        Ok(Skip)
    }
}

/// 一条记录的字段游标，按列依次转换，错误中携带文件名、行号和列号（均从1开始）。
#[derive(Debug)]
pub struct Fields {
    file: Rc<str>,
    line_no: usize,
    column: usize,
    values: std::vec::IntoIter<String>,
}

impl Fields {
    pub(crate) fn new(file: Rc<str>, line_no: usize, values: Vec<String>) -> Fields {
        Fields { file, line_no, column: 0, values: values.into_iter() }
    }

    /// 将下一列转换为`F`。
    pub fn next_field<F: FromField>(&mut self) -> StreamRes<F> {
        self.column += 1;
        let value = self.values.next().ok_or_else(|| StreamErr::CsvMissingColumn {
            file: self.file.to_string(),
            line_no: self.line_no,
            column: self.column,
        })?;
        F::from_field(&value).map_err(|err| StreamErr::CsvConvertErr {
            file: self.file.to_string(),
            line_no: self.line_no,
            column: self.column,
            value,
            err,
        })
    }

    /// 剩余的所有列。
    pub fn rest(&mut self) -> Vec<String> {
        self.column += self.values.len();
        self.values.by_ref().collect()
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

/// 由一条记录构造的类型，多余的列被忽略。
pub trait FromRecord: Sized {
    fn from_record(fields: &mut Fields) -> StreamRes<Self>;
}

/// 原样保留所有列
impl FromRecord for Vec<String> {
    fn from_record(fields: &mut Fields) -> StreamRes<Self> {
        Ok(fields.rest())
    }
}

/// 可以写为一条记录的类型。
pub trait ToRecord {
    fn to_record(&self) -> Vec<String>;
}

impl<T: Display> ToRecord for Vec<T> {
    fn to_record(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl<T: Display, const N: usize> ToRecord for [T; N] {
    fn to_record(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

macro_rules! impl_record {
    ($($T:ident),+) => {
        impl<$($T: FromField),+> FromRecord for ($($T,)+) {
            fn from_record(fields: &mut Fields) -> StreamRes<Self> {
                Ok(($(fields.next_field::<$T>()?,)+))
            }
        }

        impl<$($T: Display),+> ToRecord for ($($T,)+) {
            #[allow(non_snake_case)]
            fn to_record(&self) -> Vec<String> {
                let ($($T,)+) = self;
                vec![$($T.to_string()),+]
            }
        }
    };
}

impl_record!(A);
impl_record!(A, B);
impl_record!(A, B, C);
impl_record!(A, B, C, D);
impl_record!(A, B, C, D, E);
impl_record!(A, B, C, D, E, G);
impl_record!(A, B, C, D, E, G, H);
impl_record!(A, B, C, D, E, G, H, I);
