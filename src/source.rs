use crate::err::StreamErr;
use crate::stream::{SharedState, Stream, replay};
use crate::{Integer, StreamRes};
use std::iter;
use std::rc::Rc;

impl<T: 'static> Stream<T> {
    /// 基于可克隆的可迭代对象构造可重入的流，每次遍历克隆一次`iterable`。
    ///
    /// 适用于`Vec`、切片迭代器、范围等克隆代价可接受的数据源。
    pub fn new<I>(iterable: I) -> Stream<T>
    where
        I: IntoIterator<Item = T> + Clone + 'static,
        I::IntoIter: 'static,
    {
        Stream::from_fn(true, move || Box::new(iterable.clone().into_iter().map(Ok)))
    }

    /// 基于单次迭代器构造不可重入的流。
    ///
    /// 所有遍历共享同一个迭代器；迭代器耗尽后再开始新的遍历会得到[`StreamErr::SourceConsumed`]。
    pub fn once<I>(iterable: I) -> Stream<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Stream::shared(SharedState::Running(Box::new(iterable.into_iter().map(Ok))))
    }

    /// 空流。
    pub fn empty() -> Stream<T> {
        Stream::from_fn(true, || Box::new(iter::empty()))
    }

    /// 依次连接多个流，所有流都可重入时结果可重入。
    pub fn concat(streams: impl IntoIterator<Item = Stream<T>>) -> Stream<T> {
        let streams: Rc<[Stream<T>]> = streams.into_iter().collect();
        let reentrant = streams.iter().all(Stream::is_reentrant);
        Stream::from_fn(reentrant, move || {
            let streams = Rc::clone(&streams);
            Box::new((0..streams.len()).flat_map(move |idx| streams[idx].iter()))
        })
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// 基于字面值构造可重入的流。
    pub fn of(items: impl IntoIterator<Item = T>) -> Stream<T> {
        let items: Rc<[T]> = items.into_iter().collect();
        Stream::from_fn(true, move || replay(Rc::clone(&items)))
    }

    /// 无限重复同一个值。
    pub fn repeat(value: T) -> Stream<T> {
        Stream::from_fn(true, move || Box::new(iter::repeat(value.clone()).map(Ok)))
    }

    /// 无限迭代：`seed`、`f(seed)`、`f(f(seed))`……
    pub fn iterate(seed: T, f: impl Fn(&T) -> T + 'static) -> Stream<T> {
        let f = Rc::new(f);
        Stream::from_fn(true, move || {
            let f = Rc::clone(&f);
            Box::new(iter::successors(Some(seed.clone()), move |prev| Some(f(prev))).map(Ok))
        })
    }
}

impl Stream<Integer> {
    /// 生成`[start, stop)`范围内的整数。
    ///
    /// 起始值大于结束值时步长为`-1`，生成递减序列，否则步长为`1`。
    pub fn range(start: Integer, stop: Integer) -> Stream<Integer> {
        let step = if start > stop { -1 } else { 1 };
        Stream::from_fn(true, move || Box::new(RangeIter::new(start, stop, step).map(Ok)))
    }

    /// 生成`[0, stop)`范围内的整数，`stop`为负数时递减。
    pub fn range_to(stop: Integer) -> Stream<Integer> {
        Stream::range(0, stop)
    }

    /// 从`start`开始递增，直到整数最大值（不包含）。
    pub fn range_from(start: Integer) -> Stream<Integer> {
        Stream::range(start, Integer::MAX)
    }

    /// 按照指定步长生成`[start, stop)`范围内的整数，步长不能为0。
    ///
    /// 步长为正时生成`start`、`start + step`……直到不小于`stop`；步长为负时直到不大于`stop`。
    /// 范围与步长方向不一致时无数据生成。
    pub fn range_step(start: Integer, stop: Integer, step: Integer) -> StreamRes<Stream<Integer>> {
        if step == 0 {
            Err(StreamErr::invalid_arg("range", "step", step))?
        }
        Ok(Stream::from_fn(true, move || Box::new(RangeIter::new(start, stop, step).map(Ok))))
    }
}

#[derive(Debug, Eq, PartialEq)]
struct RangeIter {
    next: Integer,
    stop: Integer,
    step: Integer,
    overflow: bool,
}

impl RangeIter {
    fn new(start: Integer, stop: Integer, step: Integer) -> RangeIter {
        RangeIter { next: start, stop, step, overflow: false }
    }
}

impl Iterator for RangeIter {
    type Item = Integer;

    fn next(&mut self) -> Option<Self::Item> {
        let in_range = if self.step > 0 { self.next < self.stop } else { self.next > self.stop };
        if self.overflow || !in_range {
            return None;
        }
        let res = self.next;
        match self.next.checked_add(self.step) {
            Some(next) => self.next = next,
            None => self.overflow = true,
        }
        Some(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_iter() {
        assert_eq!(RangeIter::new(0, 5, 1).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!(RangeIter::new(0, 10, 3).collect::<Vec<_>>(), vec![0, 3, 6, 9]);
        assert_eq!(RangeIter::new(5, 0, -2).collect::<Vec<_>>(), vec![5, 3, 1]);
        assert_eq!(RangeIter::new(5, 0, 1).collect::<Vec<_>>(), Vec::<Integer>::new());
        assert_eq!(RangeIter::new(0, 5, -1).collect::<Vec<_>>(), Vec::<Integer>::new());
        assert_eq!(RangeIter::new(3, 3, 1).collect::<Vec<_>>(), Vec::<Integer>::new());
    }

    #[test]
    fn test_range_iter_overflow() {
        assert_eq!(
            RangeIter::new(Integer::MAX - 2, Integer::MAX, 5).collect::<Vec<_>>(),
            vec![Integer::MAX - 2]
        );
        assert_eq!(
            RangeIter::new(Integer::MIN + 1, Integer::MIN, -3).collect::<Vec<_>>(),
            vec![Integer::MIN + 1]
        );
    }

    #[test]
    fn test_range_default_step() {
        assert_eq!(Stream::range(0, 5).to_vec().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(Stream::range(5, 0).to_vec().unwrap(), vec![5, 4, 3, 2, 1]);
        assert_eq!(Stream::range_to(3).to_vec().unwrap(), vec![0, 1, 2]);
        assert_eq!(Stream::range_to(-3).to_vec().unwrap(), vec![0, -1, -2]);
        assert_eq!(Stream::range_from(7).take(3).unwrap(), vec![7, 8, 9]);
    }

    #[test]
    fn test_range_countdown() {
        let countdown = Stream::range(3, 0).map(|x| x.to_string()).join(", ").unwrap();
        assert_eq!(countdown, "3, 2, 1");
    }

    #[test]
    fn test_range_step() {
        assert_eq!(Stream::range_step(0, 10, 2).unwrap().to_vec().unwrap(), vec![0, 2, 4, 6, 8]);
        assert_eq!(Stream::range_step(10, 0, -4).unwrap().to_vec().unwrap(), vec![10, 6, 2]);
        assert_eq!(
            Stream::range_step(0, 10, 0).unwrap_err(),
            StreamErr::InvalidArg { op: "range", arg: "step", value: "0".to_string() }
        );
    }

    #[test]
    fn test_range_is_restartable() {
        let stream = Stream::range(0, 4);
        assert_eq!(stream.sum().unwrap(), 6);
        assert_eq!(stream.sum().unwrap(), 6);
    }

    #[test]
    fn test_new_restartable() {
        let stream = Stream::new(vec!["x".to_string(), "y".to_string()]);
        assert!(stream.is_reentrant());
        assert_eq!(stream.join("").unwrap(), "xy");
        assert_eq!(stream.join("-").unwrap(), "x-y");
    }

    #[test]
    fn test_empty_and_repeat() {
        assert_eq!(Stream::<i32>::empty().to_vec().unwrap(), Vec::<i32>::new());
        assert_eq!(Stream::repeat('a').take(3).unwrap(), vec!['a', 'a', 'a']);
    }

    #[test]
    fn test_iterate() {
        assert_eq!(Stream::iterate(1, |x| x * 3).take(5).unwrap(), vec![1, 3, 9, 27, 81]);
    }

    #[test]
    fn test_concat() {
        let stream = Stream::concat([Stream::of([1, 2]), Stream::of([3, 4]), Stream::of([5])]);
        assert_eq!(stream.to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
        assert!(stream.is_reentrant());
    }
}
