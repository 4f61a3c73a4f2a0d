use crate::config::CsvConfig;
use crate::csv::parse::format_record;
use crate::csv::reader::CsvRows;
use crate::err::StreamErr;
use crate::stream::Stream;
use crate::StreamRes;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::rc::Rc;

mod parse;
mod reader;
mod record;
mod sniff;

pub use record::{Fields, FromField, FromRecord, Skip, ToRecord};

impl<R: FromRecord + 'static> Stream<R> {
    /// 从CSV文件读取记录，每条记录按`R`的各列类型转换。
    ///
    /// 分隔符和表头根据文件开头的样本自动判断。每次遍历都重新打开文件，直到遍历开始才打开。
    ///
    /// ```ignore
    /// let records = Stream::<(i64, Skip, f64)>::from_csv("data.csv").to_vec()?;
    /// ```
    pub fn from_csv(file: impl Into<String>) -> Stream<R> {
        Stream::from_csv_with(file, CsvConfig::default())
    }

    pub fn from_csv_with(file: impl Into<String>, config: CsvConfig) -> Stream<R> {
        let file: Rc<str> = Rc::from(file.into());
        Stream::from_fn(true, move || {
            let name = Rc::clone(&file);
            Box::new(CsvRows::new(Rc::clone(&file), config.clone()).map(move |row| {
                let (line_no, values) = row?;
                R::from_record(&mut Fields::new(Rc::clone(&name), line_no, values))
            }))
        })
    }
}

impl Stream<Vec<String>> {
    /// 从CSV文件读取记录，不做任何转换。
    pub fn from_csv_raw(file: impl Into<String>) -> Stream<Vec<String>> {
        Stream::from_csv(file)
    }
}

impl<T: ToRecord + 'static> Stream<T> {
    /// 将所有元素写入CSV文件。
    ///
    /// `headers`为空或全部为`None`时不写表头，写入所有列；否则写入表头，
    /// 且只保留表头不为`None`的列，超出`headers`长度的列被丢弃。
    pub fn to_csv(&self, file: impl Into<String>, headers: &[Option<&str>]) -> StreamRes<()> {
        self.to_csv_with(file, headers, &CsvConfig::default())
    }

    pub fn to_csv_with(&self, file: impl Into<String>, headers: &[Option<&str>], config: &CsvConfig) -> StreamRes<()> {
        let file: String = file.into();
        let delimiter = config.write_delimiter();
        let line_ending = config.line_ending();
        let selected = if headers.iter().any(Option::is_some) { Some(headers) } else { None };

        let output =
            File::create(&file).map_err(|err| StreamErr::OpenOutputFileErr { file: file.clone(), err: err.to_string() })?;
        let mut writer = BufWriter::new(output);
        let mut write_line = |line: String| {
            write!(writer, "{line}{line_ending}").map_err(|err| StreamErr::WriteToOutputFileErr {
                file: file.clone(),
                item: line,
                err: err.to_string(),
            })
        };

        if let Some(headers) = selected {
            let names: Vec<String> = headers.iter().flatten().map(|name| name.to_string()).collect();
            write_line(format_record(&names, delimiter))?;
        }
        for item in self.iter() {
            let record = item?.to_record();
            let record = match selected {
                Some(headers) => record
                    .into_iter()
                    .zip(headers)
                    .filter_map(|(field, header)| header.map(|_| field))
                    .collect(),
                None => record,
            };
            write_line(format_record(&record, delimiter))?;
        }
        writer.flush().map_err(|err| StreamErr::WriteToOutputFileErr {
            file: file.clone(),
            item: String::new(),
            err: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Header;
    use std::fs;
    use tempfile::TempDir;

    fn path(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "data.csv");
        let records = vec![
            (0_i64, 0.5_f64, "a".to_string()),
            (1, 1.25, "b, c".to_string()),
            (2, -3.0, r#"say "hi""#.to_string()),
            (3, 10.0, "multi\nline".to_string()),
        ];
        Stream::of(records.clone()).to_csv(&file, &[Some("x"), Some("float x"), Some("label")]).unwrap();
        assert!(fs::read_to_string(&file).unwrap().starts_with("x,float x,label\n0,0.5,a\n1,1.25,\"b, c\"\n"));
        assert_eq!(Stream::<(i64, f64, String)>::from_csv(&file).to_vec().unwrap(), records);
    }

    #[test]
    fn test_pipeline_between_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = path(&dir, "gens.csv");
        let output = path(&dir, "summary.csv");
        fs::write(&input, "gen,mean,note,min,max\n1,10.5,x,9,12\n2,11.0,y,10,13\n").unwrap();

        Stream::<(Skip, f64, Skip, f64, f64)>::from_csv(&input)
            .starmap(|_: Skip, mean: f64, _: Skip, min: f64, max: f64| (mean, max - min))
            .enumerate()
            .starmap(|idx: usize, (mean, range): (f64, f64)| (idx + 1, mean, range))
            .to_csv(&output, &[Some("gen"), Some("frames_mean"), Some("frames_range")])
            .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "gen,frames_mean,frames_range\n1,10.5,3\n2,11,3\n");
    }

    #[test]
    fn test_read_convert_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "bad.csv");
        fs::write(&file, "a,b\n1,2\nx,3\n").unwrap();
        let stream = Stream::<(i64, i64)>::from_csv_with(&file, CsvConfig::new().header(Header::Skip));
        assert_eq!(stream.first().unwrap(), Some((1, 2)));
        assert_eq!(
            stream.to_vec(),
            Err(StreamErr::CsvConvertErr {
                file: file.clone(),
                line_no: 3,
                column: 1,
                value: "x".to_string(),
                err: "invalid digit found in string".to_string(),
            })
        );
    }

    #[test]
    fn test_read_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "short.csv");
        fs::write(&file, "1,2\n3\n").unwrap();
        let config = CsvConfig::new().delimiter(',').header(Header::Keep);
        assert_eq!(
            Stream::<(i64, i64)>::from_csv_with(&file, config).to_vec(),
            Err(StreamErr::CsvMissingColumn { file: file.clone(), line_no: 2, column: 2 })
        );
    }

    #[test]
    fn test_read_raw() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "raw.csv");
        fs::write(&file, "ann|oslo\nbob|rome\ncyd|nice\n").unwrap();
        let rows = Stream::from_csv_raw(&file).map(|row| row.join("-")).to_vec().unwrap();
        // 各列长度一致，第一行不视为表头
        assert_eq!(rows, vec!["ann-oslo", "bob-rome", "cyd-nice"]);
        let config = CsvConfig::new().header(Header::Skip);
        assert_eq!(Stream::<Vec<String>>::from_csv_with(&file, config).count().unwrap(), 2);
    }

    #[test]
    fn test_write_then_read_text_columns() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "cities.csv");
        let records = vec![("ann".to_string(), "oslo".to_string()), ("bob".to_string(), "rome".to_string())];
        Stream::of(records.clone()).to_csv(&file, &[Some("name"), Some("city")]).unwrap();
        assert_eq!(Stream::<(String, String)>::from_csv(&file).to_vec().unwrap(), records);
    }

    #[test]
    fn test_write_then_read_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "empty.csv");
        Stream::<(i64, f64)>::empty().to_csv(&file, &[Some("x"), Some("y")]).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "x,y\n");
        assert_eq!(Stream::<(i64, f64)>::from_csv(&file).to_vec().unwrap(), vec![]);
    }

    #[test]
    fn test_write_then_read_crlf_in_field() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "crlf.csv");
        let records = vec![(1, "first\r\nsecond".to_string()), (2, "plain".to_string())];
        let config = CsvConfig::new().crlf(true);
        Stream::of(records.clone()).to_csv_with(&file, &[Some("id"), Some("note")], &config).unwrap();
        assert_eq!(Stream::<(i32, String)>::from_csv(&file).to_vec().unwrap(), records);
    }

    #[test]
    fn test_read_quote_inside_plain_field() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "parts.csv");
        fs::write(&file, "part,count\n5\" pipe,1\nbolt,2\nnut,3\n").unwrap();
        let parts = Stream::<(String, u32)>::from_csv(&file).to_vec().unwrap();
        assert_eq!(parts, vec![("5\" pipe".to_string(), 1), ("bolt".to_string(), 2), ("nut".to_string(), 3)]);
    }

    #[test]
    fn test_custom_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "semi.csv");
        let config = CsvConfig::new().delimiter(';').crlf(true);
        Stream::of([(1, "a;b"), (2, "c,d")]).to_csv_with(&file, &[], &config).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "1;\"a;b\"\r\n2;c,d\r\n");
        let read = Stream::<(u8, String)>::from_csv_with(&file, config.header(Header::Keep)).to_vec().unwrap();
        assert_eq!(read, vec![(1, "a;b".to_string()), (2, "c,d".to_string())]);
        // 自动判断分隔符
        assert_eq!(Stream::<(u8, String)>::from_csv(&file).count().unwrap(), 2);
    }

    #[test]
    fn test_write_selected_columns() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "selected.csv");
        Stream::of([[1, 2, 3, 4], [5, 6, 7, 8]]).to_csv(&file, &[Some("a"), None, Some("c")]).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "a,c\n1,3\n5,7\n");
        Stream::of([vec![1, 2], vec![3]]).to_csv(&file, &[None, None]).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "1,2\n3\n");
    }

    #[test]
    fn test_read_reopens_per_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "later.csv");
        let stream = Stream::<(i32,)>::from_csv_with(&file, CsvConfig::new().header(Header::Keep)).map(|(x,)| x);
        assert!(stream.is_reentrant());
        assert!(matches!(stream.sum(), Err(StreamErr::OpenInputFileErr { .. })));
        fs::write(&file, "1\n2\n").unwrap();
        assert_eq!(stream.sum().unwrap(), 3);
        fs::write(&file, "1\n2\n3\n").unwrap();
        assert_eq!(stream.sum().unwrap(), 6);
        assert_eq!(stream.limit(1).to_vec().unwrap(), vec![1]);
    }

    #[test]
    fn test_write_open_failed() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().to_string_lossy().into_owned();
        assert!(matches!(Stream::of([(1,)]).to_csv(target, &[]), Err(StreamErr::OpenOutputFileErr { .. })));
    }

    #[test]
    fn test_write_stops_at_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = path(&dir, "partial.csv");
        let source = Stream::once(vec![(1,), (2,)]);
        source.count().unwrap();
        assert_eq!(source.to_csv(&file, &[Some("x")]), Err(StreamErr::SourceConsumed));
    }
}
