/// CSV表头处理方式
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Header {
    /// 根据前两行自动判断第一行是否为表头
    #[default]
    Auto,
    /// 第一行为表头，读取时跳过
    Skip,
    /// 没有表头，第一行作为数据
    Keep,
}

/// CSV读写配置。
///
/// ```ignore
/// let config = CsvConfig::new().delimiter(';').header(Header::Skip).crlf(true);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct CsvConfig {
    /// 分隔符，未指定时读取根据样本自动判断，写入使用`,`
    pub(crate) delimiter: Option<char>,
    /// 读取时的表头处理方式
    pub(crate) header: Header,
    /// 写入时使用`CRLF`换行
    pub(crate) crlf: bool,
}

impl CsvConfig {
    pub fn new() -> CsvConfig {
        CsvConfig::default()
    }

    pub fn delimiter(mut self, delimiter: char) -> CsvConfig {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn header(mut self, header: Header) -> CsvConfig {
        self.header = header;
        self
    }

    pub fn crlf(mut self, crlf: bool) -> CsvConfig {
        self.crlf = crlf;
        self
    }

    pub(crate) fn write_delimiter(&self) -> char {
        self.delimiter.unwrap_or(',')
    }

    pub(crate) fn line_ending(&self) -> &'static str {
        if self.crlf { "\r\n" } else { "\n" }
    }
}
