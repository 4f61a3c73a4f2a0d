use crate::config::{CsvConfig, Header};
use crate::csv::parse::{is_incomplete, parse_record};
use crate::csv::sniff::{DELIMITERS, sniff_delimiter, sniff_header};
use crate::err::StreamErr;
use crate::StreamRes;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::rc::Rc;

/// 用于判断分隔符和表头的样本记录数
const SAMPLE_RECORDS: usize = 5;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum ReadState {
    NotStarted,
    Reading,
    Done,
}

/// 逐条读取CSV记录，产生记录起始行号（从1开始）和字段。
///
/// 首次拉取时才打开文件，读取结束、出错或迭代器被丢弃时关闭文件。空行被忽略，引号未闭合的记录跨行拼接。
pub(crate) struct CsvRows {
    file: Rc<str>,
    config: CsvConfig,
    state: ReadState,
    reader: Option<BufReader<File>>,
    line_no: usize,
    delimiter: char,
    /// 判断引号是否位于字段开头时使用的分隔符，确定分隔符之前为所有候选分隔符
    separators: Vec<char>,
    pending: VecDeque<StreamRes<(usize, String)>>,
}

impl CsvRows {
    pub(crate) fn new(file: Rc<str>, config: CsvConfig) -> CsvRows {
        let separators = config.delimiter.map_or_else(|| DELIMITERS.to_vec(), |delimiter| vec![delimiter]);
        CsvRows {
            file,
            delimiter: config.write_delimiter(),
            config,
            state: ReadState::NotStarted,
            reader: None,
            line_no: 0,
            separators,
            pending: VecDeque::new(),
        }
    }

    fn start(&mut self) -> StreamRes<()> {
        let file = File::open(&*self.file)
            .map_err(|err| StreamErr::OpenInputFileErr { file: self.file.to_string(), err: err.to_string() })?;
        self.reader = Some(BufReader::new(file));

        if self.config.delimiter.is_none() || self.config.header == Header::Auto {
            while self.pending.len() < SAMPLE_RECORDS {
                match self.read_record() {
                    Some(record) => self.pending.push_back(record),
                    None => break,
                }
            }
        }
        let samples: Vec<&str> =
            self.pending.iter().map_while(|record| record.as_ref().ok()).map(|(_, text)| text.as_str()).collect();
        if self.config.delimiter.is_none() {
            self.delimiter = sniff_delimiter(&samples);
            self.separators = vec![self.delimiter];
        }
        let skip_header = match self.config.header {
            Header::Skip => true,
            Header::Keep => false,
            Header::Auto => {
                let rows: Vec<_> =
                    samples.iter().map_while(|text| parse_record(text, self.delimiter).ok()).collect();
                sniff_header(&rows)
            }
        };
        if skip_header {
            if let Some(Err(err)) = self.pending.pop_front().or_else(|| self.read_record()) {
                return Err(err);
            }
        }
        Ok(())
    }

    /// 读取一条完整记录的原始文本，带引号的字段内保留原始换行符。
    fn read_record(&mut self) -> Option<StreamRes<(usize, String)>> {
        let reader = self.reader.as_mut()?;
        let mut partial: Option<(usize, String)> = None;
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => {
                    return partial.map(|(line_no, _)| {
                        Err(StreamErr::CsvParseErr {
                            file: self.file.to_string(),
                            line_no,
                            err: "unterminated quoted field".to_string(),
                        })
                    });
                }
                Err(err) => {
                    return Some(Err(StreamErr::ReadFromInputFileErr {
                        file: self.file.to_string(),
                        line_no: self.line_no + 1,
                        err: err.to_string(),
                    }));
                }
                Ok(_) => {
                    self.line_no += 1;
                    let (line_no, text) = match partial.take() {
                        Some((line_no, text)) => (line_no, text + &line),
                        None if line.trim_end_matches(['\r', '\n']).is_empty() => continue,
                        None => (self.line_no, line),
                    };
                    if is_incomplete(&text, &self.separators) {
                        partial = Some((line_no, text));
                    } else {
                        return Some(Ok((line_no, trim_line_ending(text))));
                    }
                }
            }
        }
    }

    fn finish(&mut self) {
        self.state = ReadState::Done;
        self.reader = None;
        self.pending.clear();
    }
}

fn trim_line_ending(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

impl Iterator for CsvRows {
    type Item = StreamRes<(usize, Vec<String>)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            ReadState::Done => return None,
            ReadState::NotStarted => {
                self.state = ReadState::Reading;
                if let Err(err) = self.start() {
                    self.finish();
                    return Some(Err(err));
                }
            }
            ReadState::Reading => {}
        }
        match self.pending.pop_front().or_else(|| self.read_record()) {
            Some(Ok((line_no, text))) => Some(
                parse_record(&text, self.delimiter)
                    .map(|fields| (line_no, fields))
                    .map_err(|err| StreamErr::CsvParseErr { file: self.file.to_string(), line_no, err }),
            ),
            Some(Err(err)) => {
                self.finish();
                Some(Err(err))
            }
            None => {
                self.finish();
                None
            }
        }
    }
}
