use crate::{Iter, StreamRes};

/// 延迟到首次拉取时才收集上游全部元素并调用`eval`，用于排序、逆序等需要完整数据的操作。
pub(crate) struct LazyEval<T, U> {
    pending: Option<(Iter<T>, Box<dyn FnOnce(Vec<T>) -> Vec<U>>)>,
    output: std::vec::IntoIter<U>,
}

impl<T, U> LazyEval<T, U> {
    pub(crate) fn new(source: Iter<T>, eval: impl FnOnce(Vec<T>) -> Vec<U> + 'static) -> LazyEval<T, U> {
        LazyEval { pending: Some((source, Box::new(eval))), output: Vec::new().into_iter() }
    }
}

impl<T, U> Iterator for LazyEval<T, U> {
    type Item = StreamRes<U>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((source, eval)) = self.pending.take() {
            match source.collect::<StreamRes<Vec<T>>>() {
                Ok(items) => self.output = eval(items).into_iter(),
                Err(err) => return Some(Err(err)),
            }
        }
        self.output.next().map(Ok)
    }
}

/// 无限循环，首轮边输出边缓存。
pub(crate) struct CycleIter<T> {
    source: Option<Iter<T>>,
    cache: Vec<T>,
    pos: usize,
}

impl<T> CycleIter<T> {
    pub(crate) fn new(source: Iter<T>) -> CycleIter<T> {
        CycleIter { source: Some(source), cache: Vec::new(), pos: 0 }
    }
}

impl<T: Clone> Iterator for CycleIter<T> {
    type Item = StreamRes<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = &mut self.source {
            match source.next() {
                Some(Ok(item)) => {
                    self.cache.push(item.clone());
                    return Some(Ok(item));
                }
                Some(Err(err)) => return Some(Err(err)),
                None => self.source = None,
            }
        }
        if self.cache.is_empty() {
            return None;
        }
        let item = self.cache[self.pos].clone();
        self.pos = (self.pos + 1) % self.cache.len();
        Some(Ok(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::StreamErr;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_lazy_eval_defers_collect() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let source: Iter<i32> = Box::new((0..3).inspect(move |_| counter.set(counter.get() + 1)).map(Ok));
        let mut iter = LazyEval::new(source, |mut items| {
            items.reverse();
            items
        });
        assert_eq!(pulled.get(), 0);
        assert_eq!(iter.next(), Some(Ok(2)));
        assert_eq!(pulled.get(), 3);
        assert_eq!(iter.by_ref().collect::<Vec<_>>(), vec![Ok(1), Ok(0)]);
    }

    #[test]
    fn test_lazy_eval_error() {
        let source: Iter<i32> = Box::new(vec![Ok(1), Err(StreamErr::SourceConsumed)].into_iter());
        let mut iter = LazyEval::new(source, |items| items);
        assert_eq!(iter.next(), Some(Err(StreamErr::SourceConsumed)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_cycle_iter() {
        let iter = CycleIter::new(Box::new((1..=2).map(Ok)));
        assert_eq!(iter.take(5).collect::<Vec<_>>(), vec![Ok(1), Ok(2), Ok(1), Ok(2), Ok(1)]);
        let mut empty = CycleIter::<i32>::new(Box::new(std::iter::empty()));
        assert_eq!(empty.next(), None);
    }
}
