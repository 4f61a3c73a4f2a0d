mod buffer;
mod group;
mod slice;
mod transpose;

use crate::err::StreamErr;
use crate::op::buffer::{CycleIter, LazyEval};
use crate::op::group::GroupIter;
use crate::op::slice::SliceIter;
use crate::op::transpose::TransposeIter;
use crate::print::eprintln_notice;
use crate::starmap::Unpack;
use crate::stream::Stream;
use crate::StreamRes;
use itertools::{Either, Itertools};
use rustc_hash::FxHashSet;
use std::fmt::{Debug, Display};
use std::fs::OpenOptions;
use std::hash::Hash;
use std::io::Write;
use std::iter;
use std::rc::Rc;

/* **************************************** 无状态中间操作 **************************************** */
impl<T: 'static> Stream<T> {
    /// 对每个元素应用`f`。
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Stream<U> {
        let f = Rc::new(f);
        self.wrap(move |iter| {
            let f = Rc::clone(&f);
            Box::new(iter.map(move |item| item.map(|x| f(x))))
        })
    }

    /// 将每个元组元素拆开作为多个参数调用`f`。
    ///
    /// ```ignore
    /// Stream::of([(2, 5), (3, 2), (10, 3)]).starmap(|base: i64, exp: u32| base.pow(exp)); // 32 9 1000
    /// ```
    pub fn starmap<F>(&self, f: F) -> Stream<T::Output>
    where
        T: Unpack<F>,
        T::Output: 'static,
        F: 'static,
    {
        self.map(move |args: T| args.unpack(&f))
    }

    /// 保留满足`predicate`的元素。
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        let predicate = Rc::new(predicate);
        self.wrap(move |iter| {
            let predicate = Rc::clone(&predicate);
            Box::new(iter.filter(move |item| match item {
                Ok(x) => predicate(x),
                Err(_) => true,
            }))
        })
    }

    /// 每个元素与其从0开始的索引组成二元组。
    pub fn enumerate(&self) -> Stream<(usize, T)> {
        self.wrap(|iter| Box::new(iter.enumerate().map(|(idx, item)| item.map(|x| (idx, x)))))
    }

    /// 展开一层嵌套。
    pub fn flatten(&self) -> Stream<T::Item>
    where
        T: IntoIterator,
        T::IntoIter: 'static,
        T::Item: 'static,
    {
        self.wrap(|iter| {
            Box::new(iter.flat_map(|item| match item {
                Ok(inner) => Either::Left(inner.into_iter().map(Ok)),
                Err(err) => Either::Right(iter::once(Err(err))),
            }))
        })
    }

    /// 在当前流之前插入`other`。
    pub fn prepend(&self, other: &Stream<T>) -> Stream<T> {
        Stream::concat([other.clone(), self.clone()])
    }

    /// 在当前流之后追加`other`。
    pub fn append(&self, other: &Stream<T>) -> Stream<T> {
        Stream::concat([self.clone(), other.clone()])
    }

    /// 按照索引切片，保留`[start, stop)`范围内每隔`step`个的元素，`stop`为`None`时不限制结束位置。
    ///
    /// 到达`stop`后不再从上游拉取数据。
    pub fn slice(&self, start: usize, stop: Option<usize>, step: usize) -> StreamRes<Stream<T>> {
        if step == 0 {
            Err(StreamErr::invalid_arg("slice", "step", step))?
        }
        Ok(self.wrap(move |iter| Box::new(SliceIter::new(iter, start, stop, step))))
    }

    /// 丢弃前`count`个元素。
    pub fn skip(&self, count: usize) -> Stream<T> {
        self.wrap(move |iter| Box::new(SliceIter::new(iter, count, None, 1)))
    }

    /// 只保留前`count`个元素。
    pub fn limit(&self, count: usize) -> Stream<T> {
        self.wrap(move |iter| Box::new(SliceIter::new(iter, 0, Some(count), 1)))
    }

    /// 遍历时对每个元素调用`f`，不改变元素。
    pub fn inspect(&self, f: impl Fn(&T) + 'static) -> Stream<T> {
        let f = Rc::new(f);
        self.wrap(move |iter| {
            let f = Rc::clone(&f);
            Box::new(iter.inspect(move |item| {
                if let Ok(x) = item {
                    f(x)
                }
            }))
        })
    }

    /// 打印每个元素到标准输出。
    pub fn peek(&self) -> Stream<T>
    where
        T: Display,
    {
        self.inspect(|item| println!("{item}"))
    }

    /// 写入每个元素到文件，每次遍历重新打开文件，遍历结束时关闭。
    ///
    /// `append`为`true`时追加写入，否则覆盖；`crlf`为`true`时使用`CRLF`换行，否则使用`LF`。
    pub fn peek_file(&self, file: impl Into<String>, append: bool, crlf: bool) -> Stream<T>
    where
        T: Display,
    {
        let file: String = file.into();
        let postfix = if crlf { "\r\n" } else { "\n" };
        self.wrap(move |iter| {
            let file = file.clone();
            match OpenOptions::new().write(true).truncate(!append).append(append).create(true).open(&file) {
                Ok(mut writer) => Box::new(iter.map(move |item| {
                    if let Ok(x) = &item {
                        if let Err(err) = write!(writer, "{x}{postfix}") {
                            return Err(StreamErr::WriteToOutputFileErr {
                                file: file.clone(),
                                item: x.to_string(),
                                err: err.to_string(),
                            });
                        }
                    }
                    item
                })),
                Err(err) => Box::new(iter::once(Err(StreamErr::OpenOutputFileErr { file, err: err.to_string() }))),
            }
        })
    }

    /// 输出每个元素及其索引到标准错误，用于排查流水线。
    pub fn trace(&self, label: impl Into<String>) -> Stream<T>
    where
        T: Debug,
    {
        let label: Rc<str> = label.into().into();
        self.wrap(move |iter| {
            let label = Rc::clone(&label);
            Box::new(iter.enumerate().map(move |(idx, item)| {
                match &item {
                    Ok(x) => eprintln_notice!("[{label}] #{idx} {x:?}"),
                    Err(err) => eprintln_notice!("[{label}] #{idx} {err}"),
                }
                item
            }))
        })
    }
}

/* **************************************** 有状态中间操作 **************************************** */
impl<T: 'static> Stream<T> {
    /// 去重，保留首次出现的元素及其顺序。
    ///
    /// 只要求元素可以比较相等，不要求可哈希或可排序，每个元素与已保留的元素逐一比较。
    pub fn unique(&self) -> Stream<T>
    where
        T: PartialEq + Clone,
    {
        self.wrap(|iter| {
            let mut seen: Vec<T> = Vec::new();
            Box::new(iter.filter(move |item| match item {
                Ok(x) if seen.contains(x) => false,
                Ok(x) => {
                    seen.push(x.clone());
                    true
                }
                Err(_) => true,
            }))
        })
    }

    /// 与[`Stream::unique`]语义相同，基于哈希判断重复。
    pub fn unique_hashed(&self) -> Stream<T>
    where
        T: Hash + Eq + Clone,
    {
        self.wrap(|iter| {
            let mut seen = FxHashSet::default();
            Box::new(iter.filter(move |item| match item {
                Ok(x) => seen.insert(x.clone()),
                Err(_) => true,
            }))
        })
    }

    /// 按照固定大小分组，最后一组元素不足时按实际数量输出。
    ///
    /// ```ignore
    /// Stream::range(0, 7).group(3)?; // [0, 1, 2] [3, 4, 5] [6]
    /// ```
    pub fn group(&self, size: usize) -> StreamRes<Stream<Vec<T>>> {
        if size == 0 {
            Err(StreamErr::invalid_arg("group", "size", size))?
        }
        Ok(self.wrap(move |iter| Box::new(GroupIter::new(iter, size))))
    }

    /// 按照固定大小分组，最后一组元素不足时使用`fill`补齐。
    pub fn group_fill(&self, size: usize, fill: T) -> StreamRes<Stream<Vec<T>>>
    where
        T: Clone,
    {
        Ok(self.group(size)?.map(move |mut group| {
            group.resize(size, fill.clone());
            group
        }))
    }

    /// 转置：将每个可迭代元素的第i个值组成第i个输出，长度取最短的可迭代元素。
    ///
    /// 没有可迭代元素时输出为空。
    pub fn zip(&self) -> Stream<Vec<T::Item>>
    where
        T: IntoIterator,
        T::IntoIter: 'static,
        T::Item: 'static,
    {
        self.wrap(|iter| Box::new(TransposeIter::new(iter, None)))
    }

    /// 转置，长度取最长的可迭代元素，缺少的值使用`fill`补齐。
    pub fn zip_fill(&self, fill: T::Item) -> Stream<Vec<T::Item>>
    where
        T: IntoIterator,
        T::IntoIter: 'static,
        T::Item: Clone + 'static,
    {
        let fill = Rc::new(fill);
        self.wrap(move |iter| {
            let fill = Rc::clone(&fill);
            Box::new(TransposeIter::new(iter, Some(Box::new(move || (*fill).clone()))))
        })
    }

    /// 升序排序，排序稳定。
    pub fn sort(&self) -> Stream<T>
    where
        T: Ord,
    {
        self.buffered(|mut items| {
            items.sort();
            items
        })
    }

    /// 降序排序，排序稳定。
    pub fn sort_desc(&self) -> Stream<T>
    where
        T: Ord,
    {
        self.buffered(|mut items| {
            items.sort_by(|l, r| r.cmp(l));
            items
        })
    }

    /// 按照`key`升序排序，排序稳定。
    pub fn sort_by_key<K: Ord + 'static>(&self, key: impl Fn(&T) -> K + 'static) -> Stream<T> {
        let key = Rc::new(key);
        self.wrap(move |iter| {
            let key = Rc::clone(&key);
            Box::new(LazyEval::new(iter, move |mut items: Vec<T>| {
                items.sort_by_key(|x| key(x));
                items
            }))
        })
    }

    /// 逆序。
    pub fn reverse(&self) -> Stream<T> {
        self.buffered(|mut items| {
            items.reverse();
            items
        })
    }

    /// 将`key`相同的连续元素分为一组，输出`(key, 组内元素)`。
    pub fn group_by<K>(&self, key: impl Fn(&T) -> K + 'static) -> Stream<(K, Vec<T>)>
    where
        K: PartialEq + 'static,
    {
        let key = Rc::new(key);
        self.wrap(move |iter| {
            let key = Rc::clone(&key);
            Box::new(LazyEval::new(iter, move |items: Vec<T>| chunk_by_key(items, |x| key(x))))
        })
    }

    /// 先按照`key`排序，再将`key`相同的元素分为一组，每个`key`只输出一组。
    pub fn sort_group_by<K>(&self, key: impl Fn(&T) -> K + 'static) -> Stream<(K, Vec<T>)>
    where
        K: Ord + 'static,
    {
        let key = Rc::new(key);
        self.wrap(move |iter| {
            let key = Rc::clone(&key);
            Box::new(LazyEval::new(iter, move |mut items: Vec<T>| {
                items.sort_by_key(|x| key(x));
                chunk_by_key(items, |x| key(x))
            }))
        })
    }

    /// 无限循环输出，首轮遍历时缓存元素，上游为空时输出为空。
    pub fn cycle(&self) -> Stream<T>
    where
        T: Clone,
    {
        self.wrap(|iter| Box::new(CycleIter::new(iter)))
    }

    /// 整体重复`times`次。
    pub fn repeat_times(&self, times: usize) -> Stream<T>
    where
        T: Clone,
    {
        self.buffered(move |items| iter::repeat_n(items, times).flatten().collect())
    }

    /// 首次拉取时缓存上游全部元素，经`eval`处理后逐个输出。
    fn buffered<U: 'static>(&self, eval: impl Fn(Vec<T>) -> Vec<U> + Clone + 'static) -> Stream<U> {
        self.wrap(move |iter| Box::new(LazyEval::new(iter, eval.clone())))
    }
}

fn chunk_by_key<T, K: PartialEq>(items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<(K, Vec<T>)> {
    let chunks = items.into_iter().chunk_by(|x| key(x));
    chunks.into_iter().map(|(k, group)| (k, group.collect())).collect()
}
