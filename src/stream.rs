use crate::err::StreamErr;
use crate::{Iter, StreamRes};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::iter;
use std::rc::Rc;

/// 惰性求值的流。
///
/// 流只保存一个可以重复调用的数据源工厂，每个终止操作调用一次工厂，完整地遍历一次组合后的各阶段。
/// 中间操作不会修改当前流，而是返回组合了新阶段的流，原流仍然可用；各阶段的结果不做缓存，
/// 对同一个流调用两次终止操作会从数据源重新遍历。
///
/// 是否可重入取决于数据源：基于字面值、范围、文件的流每次遍历都从头开始；基于单次迭代器的流
/// （[`Stream::once`]）在所有遍历间共享同一个迭代器，耗尽后再次遍历返回[`StreamErr::SourceConsumed`]。
pub struct Stream<T> {
    source: Rc<dyn Fn() -> Iter<T>>,
    reentrant: bool,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Stream { source: Rc::clone(&self.source), reentrant: self.reentrant }
    }
}

impl<T> Debug for Stream<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream").field("reentrant", &self.reentrant).finish_non_exhaustive()
    }
}

impl<T: 'static> Stream<T> {
    pub(crate) fn from_fn(reentrant: bool, source: impl Fn() -> Iter<T> + 'static) -> Stream<T> {
        Stream { source: Rc::new(source), reentrant }
    }

    /// 在当前流之后组合一个阶段，`stage`在每次遍历开始时作用于上游迭代器。
    pub(crate) fn wrap<U: 'static>(&self, stage: impl Fn(Iter<T>) -> Iter<U> + 'static) -> Stream<U> {
        let source = Rc::clone(&self.source);
        Stream::from_fn(self.reentrant, move || stage(source()))
    }

    /// 开始一次遍历。
    ///
    /// 返回的迭代器逐个产生`Result`，数据源或某个阶段出错时产生`Err`。
    pub fn iter(&self) -> Iter<T> {
        (self.source)()
    }

    /// 当前流是否可重入，即每次遍历都从数据源的开头开始。
    pub fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    /// 确保流可重入：首次遍历时缓存全部元素，之后的遍历重放缓存。
    ///
    /// 对可重入的流是空操作。
    pub fn reentrant(&self) -> Stream<T>
    where
        T: Clone,
    {
        if self.reentrant {
            return self.clone();
        }
        let source = Rc::clone(&self.source);
        let cache: Rc<RefCell<Option<Rc<[T]>>>> = Rc::default();
        Stream::from_fn(true, move || {
            let cached = cache.borrow().clone();
            let items = match cached {
                Some(items) => items,
                None => match source().collect::<StreamRes<Rc<[T]>>>() {
                    Ok(items) => {
                        *cache.borrow_mut() = Some(Rc::clone(&items));
                        items
                    }
                    Err(err) => return Box::new(iter::once(Err(err))),
                },
            };
            replay(items)
        })
    }

    /// 确保流不可重入：所有遍历共享同一个底层迭代器，后一次遍历从前一次停止的位置继续。
    ///
    /// 对不可重入的流是空操作。
    pub fn nonreentrant(&self) -> Stream<T> {
        if !self.reentrant {
            return self.clone();
        }
        let source = Rc::clone(&self.source);
        Stream::shared(SharedState::Pending(Box::new(move || source())))
    }

    pub(crate) fn shared(state: SharedState<T>) -> Stream<T> {
        let shared = Rc::new(RefCell::new(state));
        Stream::from_fn(false, move || Box::new(SharedIter { shared: Rc::clone(&shared), started: false }))
    }
}

impl<T: 'static> IntoIterator for &Stream<T> {
    type Item = StreamRes<T>;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone + 'static> FromIterator<T> for Stream<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Stream::of(iter)
    }
}

/// 重放缓存的元素。
pub(crate) fn replay<T: Clone + 'static>(items: Rc<[T]>) -> Iter<T> {
    Box::new((0..items.len()).map(move |idx| Ok(items[idx].clone())))
}

/// 不可重入数据源的共享状态。
pub(crate) enum SharedState<T> {
    /// 尚未开始，首次拉取时创建迭代器
    Pending(Box<dyn FnOnce() -> Iter<T>>),
    Running(Iter<T>),
    Exhausted,
}

struct SharedIter<T> {
    shared: Rc<RefCell<SharedState<T>>>,
    started: bool,
}

impl<T> Iterator for SharedIter<T> {
    type Item = StreamRes<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let started = std::mem::replace(&mut self.started, true);
        let mut state = self.shared.borrow_mut();
        if matches!(*state, SharedState::Pending(_)) {
            if let SharedState::Pending(init) = std::mem::replace(&mut *state, SharedState::Exhausted) {
                *state = SharedState::Running(init());
            }
        }
        match &mut *state {
            SharedState::Running(iter) => {
                let next = iter.next();
                if next.is_none() {
                    *state = SharedState::Exhausted;
                }
                next
            }
            // 在已耗尽的数据源上开始新的遍历
            SharedState::Exhausted if !started => Some(Err(StreamErr::SourceConsumed)),
            _ => None,
        }
    }
}
