use crate::{Iter, StreamRes};

/// 保留`[start, stop)`范围内每隔`step`个的元素，到达`stop`后不再拉取上游。
pub(crate) struct SliceIter<T> {
    source: Iter<T>,
    start: usize,
    stop: Option<usize>,
    step: usize,
    idx: usize,
}

impl<T> SliceIter<T> {
    pub(crate) fn new(source: Iter<T>, start: usize, stop: Option<usize>, step: usize) -> SliceIter<T> {
        SliceIter { source, start, stop, step, idx: 0 }
    }
}

impl<T> Iterator for SliceIter<T> {
    type Item = StreamRes<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.stop.is_some_and(|stop| self.idx >= stop) {
                return None;
            }
            let item = self.source.next()?;
            let idx = self.idx;
            self.idx += 1;
            match item {
                Ok(x) if idx >= self.start && (idx - self.start) % self.step == 0 => return Some(Ok(x)),
                Ok(_) => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
