use itertools::Itertools;

/// 候选分隔符，按优先级排列
pub(crate) const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// 根据样本判断分隔符：选择在每条样本中出现次数相同且不为0的候选分隔符，出现次数相同时按优先级选择，
/// 都不满足时使用`,`。
pub(crate) fn sniff_delimiter(samples: &[&str]) -> char {
    DELIMITERS
        .iter()
        .filter_map(|&delimiter| {
            let count = samples.iter().map(|sample| count_unquoted(sample, delimiter)).all_equal_value().ok()?;
            (count > 0).then_some((delimiter, count))
        })
        .min_by_key(|(_, count)| std::cmp::Reverse(*count))
        .map_or(',', |(delimiter, _)| delimiter)
}

/// 统计带引号的字段之外的`target`个数，以`target`作为分隔符判断字段开头。
fn count_unquoted(text: &str, target: char) -> usize {
    let mut quoted = false;
    let mut field_start = true;
    let mut count = 0;
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
            field_start = c == target;
            if field_start {
                count += 1;
            }
        }
    }
    count
}

/// 样本中一列数据的类型
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum ColumnKind {
    Number,
    /// 非数值，记录字符数
    Text(usize),
}

impl ColumnKind {
    fn of(field: &str) -> ColumnKind {
        if is_number(field) { ColumnKind::Number } else { ColumnKind::Text(field.chars().count()) }
    }
}

/// 判断样本的第一条记录是否为表头。
///
/// 其余记录中类型一致的列参与投票：数值列的表头不是数值、定长文本列的表头长度不同时投表头一票，否则投数据一票，
/// 平票视为表头。只有一条记录时，除非全部为数值，否则视为表头。
pub(crate) fn sniff_header(rows: &[Vec<String>]) -> bool {
    let Some((header, data)) = rows.split_first() else {
        return false;
    };
    if data.is_empty() {
        return !header.iter().all(|field| is_number(field));
    }
    let votes: i32 = header
        .iter()
        .enumerate()
        .filter_map(|(column, head)| {
            let mut kinds = data.iter().map(|row| row.get(column).map(|field| ColumnKind::of(field)));
            let kind = kinds.all_equal_value().ok()??;
            Some(if kind == ColumnKind::of(head) { -1 } else { 1 })
        })
        .sum();
    votes >= 0
}

/// 有限的数值，`inf`、`nan`等不视为数值。
fn is_number(field: &str) -> bool {
    field.trim().parse::<f64>().is_ok_and(f64::is_finite)
}
