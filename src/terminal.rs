use crate::stream::Stream;
use crate::StreamRes;
use itertools::Itertools;
use std::fmt::Display;
use std::iter::Sum;
use std::ops::Add;

/// 终止操作：每次调用完整遍历一次流（短路操作除外），遇到第一个错误时立即返回。
impl<T: 'static> Stream<T> {
    /// 收集到任意容器，例如`Vec`、`HashSet`、`BTreeSet`、`String`，或由二元组收集到`HashMap`。
    pub fn to<C: FromIterator<T>>(&self) -> StreamRes<C> {
        self.iter().collect()
    }

    pub fn to_vec(&self) -> StreamRes<Vec<T>> {
        self.to()
    }

    /// 使用`separator`连接所有元素。
    pub fn join(&self, separator: &str) -> StreamRes<String>
    where
        T: Display,
    {
        itertools::process_results(self.iter(), |mut iter| iter.join(separator))
    }

    /// 求和，空流返回零值。
    pub fn sum(&self) -> StreamRes<T>
    where
        T: Sum,
    {
        self.iter().sum()
    }

    /// 从`initial`开始求和。
    pub fn sum_from(&self, initial: T) -> StreamRes<T>
    where
        T: Add<Output = T>,
    {
        self.fold(initial, |acc, x| acc + x)
    }

    pub fn fold<B>(&self, initial: B, f: impl FnMut(B, T) -> B) -> StreamRes<B> {
        self.iter().fold_ok(initial, f)
    }

    /// 使用第一个元素作为初始值累积，空流返回`None`。
    pub fn reduce(&self, f: impl FnMut(T, T) -> T) -> StreamRes<Option<T>> {
        itertools::process_results(self.iter(), |iter| iter.reduce(f))
    }

    pub fn count(&self) -> StreamRes<usize> {
        itertools::process_results(self.iter(), |iter| iter.count())
    }

    /// 取第一个元素，只从上游拉取一个元素。
    pub fn first(&self) -> StreamRes<Option<T>> {
        self.iter().next().transpose()
    }

    /// 取前`count`个元素，不足时按实际数量返回。
    pub fn take(&self, count: usize) -> StreamRes<Vec<T>> {
        self.iter().take(count).collect()
    }

    /// 取前`count`个元素，不足时使用`fill`补齐。
    pub fn take_fill(&self, count: usize, fill: T) -> StreamRes<Vec<T>>
    where
        T: Clone,
    {
        let mut items = self.take(count)?;
        items.resize(count, fill);
        Ok(items)
    }

    /// 所有元素都满足`predicate`时返回`true`，空流返回`true`，遇到不满足的元素即停止。
    pub fn all(&self, predicate: impl Fn(&T) -> bool) -> StreamRes<bool> {
        for item in self.iter() {
            if !predicate(&item?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// 任一元素满足`predicate`时返回`true`，空流返回`false`，遇到满足的元素即停止。
    pub fn any(&self, predicate: impl Fn(&T) -> bool) -> StreamRes<bool> {
        for item in self.iter() {
            if predicate(&item?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn for_each(&self, mut f: impl FnMut(T)) -> StreamRes<()> {
        for item in self.iter() {
            f(item?);
        }
        Ok(())
    }

    pub fn min(&self) -> StreamRes<Option<T>>
    where
        T: Ord,
    {
        itertools::process_results(self.iter(), |iter| iter.min())
    }

    pub fn max(&self) -> StreamRes<Option<T>>
    where
        T: Ord,
    {
        itertools::process_results(self.iter(), |iter| iter.max())
    }

    pub fn min_by_key<K: Ord>(&self, key: impl FnMut(&T) -> K) -> StreamRes<Option<T>> {
        itertools::process_results(self.iter(), |iter| iter.min_by_key(key))
    }

    pub fn max_by_key<K: Ord>(&self, key: impl FnMut(&T) -> K) -> StreamRes<Option<T>> {
        itertools::process_results(self.iter(), |iter| iter.max_by_key(key))
    }
}
