use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum StreamErr {
    #[error("[Bad Arg] Invalid value `{value}` of argument `{arg}` for op `{op}`")]
    InvalidArg { op: &'static str, arg: &'static str, value: String },

    #[error("[Source] Single-use source has already been consumed")]
    SourceConsumed,

    #[error("[Input] Open input file `{file}` error: {err}")]
    OpenInputFileErr { file: String, err: String },

    #[error("[Input] Read line `{line_no}` of input file `{file}` error: {err}")]
    ReadFromInputFileErr { file: String, line_no: usize, err: String },

    #[error("[Output] Open output file `{file}` error: {err}")]
    OpenOutputFileErr { file: String, err: String },

    #[error("[Output] Write item `{item}` to file `{file}` error: {err}")]
    WriteToOutputFileErr { file: String, item: String, err: String },

    #[error("[Csv] Malformed line `{line_no}` of file `{file}`, error: {err}")]
    CsvParseErr { file: String, line_no: usize, err: String },

    #[error("[Csv] Missing column `{column}` at line `{line_no}` of file `{file}`")]
    CsvMissingColumn { file: String, line_no: usize, column: usize },

    #[error("[Csv] Unable to convert `{value}` in column `{column}` at line `{line_no}` of file `{file}`, error: {err}")]
    CsvConvertErr { file: String, line_no: usize, column: usize, value: String, err: String },
}

impl StreamErr {
    pub(crate) fn invalid_arg(op: &'static str, arg: &'static str, value: impl ToString) -> StreamErr {
        StreamErr::InvalidArg { op, arg, value: value.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            StreamErr::invalid_arg("group", "size", 0).to_string(),
            "[Bad Arg] Invalid value `0` of argument `size` for op `group`"
        );
        assert_eq!(
            StreamErr::CsvConvertErr {
                file: "data.csv".to_string(),
                line_no: 3,
                column: 1,
                value: "abc".to_string(),
                err: "invalid digit found in string".to_string(),
            }
            .to_string(),
            "[Csv] Unable to convert `abc` in column `1` at line `3` of file `data.csv`, error: invalid digit found in string"
        );
    }
}
