/// 输出到标准错误，终端下使用紫色高亮。
macro_rules! eprintln_notice {
    () => {};
    ($($arg:tt)*) => {
        if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
            eprint!("\x1b[35m");
            eprint!($($arg)*);
            eprintln!("\x1b[0m");
        } else {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use eprintln_notice;
