use crate::{Iter, StreamRes};

/// 按照固定大小分组，最后一组可能不足`group_size`个元素。
pub(crate) struct GroupIter<T> {
    source: Iter<T>,
    group_size: usize,
    done: bool,
}

impl<T> GroupIter<T> {
    pub(crate) fn new(source: Iter<T>, group_size: usize) -> GroupIter<T> {
        GroupIter { source, group_size, done: false }
    }
}

impl<T> Iterator for GroupIter<T> {
    type Item = StreamRes<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut group = Vec::with_capacity(self.group_size);
        while group.len() < self.group_size {
            match self.source.next() {
                Some(Ok(item)) => group.push(item),
                Some(Err(err)) => return Some(Err(err)),
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if group.is_empty() { None } else { Some(Ok(group)) }
    }
}
