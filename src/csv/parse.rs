use itertools::Itertools;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, none_of};
use nom::combinator::{all_consuming, map, not, value};
use nom::error::Error;
use nom::multi::{fold_many0, separated_list1};
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use std::borrow::Cow;

/// 解析一条记录，字段之间以`delimiter`分隔。
pub(crate) fn parse_record(text: &str, delimiter: char) -> Result<Vec<String>, String> {
    all_consuming(separated_list1(char(delimiter), alt((quoted_field, plain_field(delimiter)))))
        .parse(text)
        .map(|(_, fields)| fields)
        .map_err(|err| err.to_string())
}

/// 解析器，支持解析双引号包围的字段，字段内的`""`表示一个双引号，可以包含分隔符和换行。
fn quoted_field(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        fold_many0(alt((value('"', tag("\"\"")), none_of("\""))), String::new, |mut field, c| {
            field.push(c);
            field
        }),
        char('"'),
    )
    .parse(input)
}

/// 构造一个解析器，支持解析不以引号开头的字段，直到分隔符为止，可以为空，字段中间的引号按普通字符处理。
fn plain_field<'a>(delimiter: char) -> impl Parser<&'a str, Output = String, Error = Error<&'a str>> {
    map(preceded(not(char('"')), take_while(move |c: char| c != delimiter)), |field: &str| field.to_string())
}

/// 记录中以引号开头的字段未闭合，需要拼接下一行。
///
/// 只有位于行首或紧跟`separators`中某个分隔符的引号才开始一个带引号的字段。
pub(crate) fn is_incomplete(text: &str, separators: &[char]) -> bool {
    let mut quoted = false;
    let mut field_start = true;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if quoted {
            if c == '"' && chars.next_if_eq(&'"').is_none() {
                quoted = false;
            }
        } else if c == '"' && field_start {
            quoted = true;
            field_start = false;
        } else {
            field_start = separators.contains(&c);
        }
    }
    quoted
}

/// 格式化一条记录，包含分隔符、引号或换行的字段使用双引号包围。
pub(crate) fn format_record(fields: &[String], delimiter: char) -> String {
    if let [field] = fields {
        if field.is_empty() {
            // 单个空字段的记录与空行区分
            return "\"\"".to_string();
        }
    }
    fields.iter().map(|field| quote_field(field, delimiter)).join(&delimiter.to_string())
}

fn quote_field(field: &str, delimiter: char) -> Cow<'_, str> {
    if field.contains(|c: char| c == delimiter || c == '"' || c == '\n' || c == '\r') {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
