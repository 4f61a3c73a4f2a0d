use crate::{Iter, StreamRes};

/// 转置可迭代元素组成的流。
///
/// 首次拉取时收集上游全部可迭代元素，之后每次从每个可迭代元素各取一个值。
/// 未指定`fill`时任一可迭代元素耗尽即结束；指定`fill`时所有可迭代元素都耗尽才结束，缺少的值由`fill`生成。
pub(crate) struct TransposeIter<T: IntoIterator> {
    source: Option<Iter<T>>,
    inners: Vec<T::IntoIter>,
    fill: Option<Box<dyn Fn() -> T::Item>>,
}

impl<T: IntoIterator> TransposeIter<T> {
    pub(crate) fn new(source: Iter<T>, fill: Option<Box<dyn Fn() -> T::Item>>) -> TransposeIter<T> {
        TransposeIter { source: Some(source), inners: Vec::new(), fill }
    }
}

impl<T: IntoIterator> Iterator for TransposeIter<T> {
    type Item = StreamRes<Vec<T::Item>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.source.take() {
            match source.map(|item| item.map(IntoIterator::into_iter)).collect::<StreamRes<Vec<_>>>() {
                Ok(inners) => self.inners = inners,
                Err(err) => return Some(Err(err)),
            }
        }
        if self.inners.is_empty() {
            return None;
        }
        let mut row = Vec::with_capacity(self.inners.len());
        let mut exhausted = 0;
        let mut truncated = false;
        for inner in self.inners.iter_mut() {
            match (inner.next(), &self.fill) {
                (Some(value), _) => row.push(value),
                (None, Some(fill)) => {
                    exhausted += 1;
                    row.push(fill());
                }
                (None, None) => {
                    truncated = true;
                    break;
                }
            }
        }
        if truncated || exhausted == self.inners.len() {
            self.inners.clear();
            return None;
        }
        Some(Ok(row))
    }
}
