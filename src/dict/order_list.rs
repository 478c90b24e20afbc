#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list whose nodes live in a slot vector and are addressed by index.
///
/// Indices handed out by [OrderList::push_back] stay valid until the node is removed. Freed slots
/// are reused by later pushes, so the slot vector never grows beyond the peak length of the list.
#[derive(Debug)]
pub(crate) struct OrderList<T> {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
}

impl<T> OrderList<T> {
    pub(crate) fn with_capacity(capacity: usize) -> OrderList<T> {
        OrderList {
            head: None,
            tail: None,
            len: 0,
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn front(&self) -> Option<usize> {
        self.head
    }

    pub(crate) fn back(&self) -> Option<usize> {
        self.tail
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .map(|node| &node.value)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    /// Appends an item to the back of the list and returns its index.
    pub(crate) fn push_back(&mut self, value: T) -> usize {
        let node = Node {
            value,
            prev: None,
            next: None,
        };

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.link_back(index);
        self.len += 1;
        index
    }

    /// Unlinks the item stored at `index` and frees its slot.
    ///
    /// Returns [None] if the slot is vacant or out of bounds.
    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        if !self.is_occupied(index) {
            return None;
        }

        self.unlink(index);
        let node = self.slots[index].take()?;
        self.free.push(index);
        self.len -= 1;

        Some(node.value)
    }

    /// Relinks the item stored at `index` at the back of the list. Its index does not change.
    pub(crate) fn move_to_back(&mut self, index: usize) -> bool {
        if !self.is_occupied(index) {
            return false;
        }

        if self.tail != Some(index) {
            self.unlink(index);
            self.link_back(index);
        }

        true
    }

    pub(crate) fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.len = 0;
        self.slots.clear();
        self.free.clear();
    }

    /// Iterates from front to back, yielding each item with its index.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    fn is_occupied(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        self.slots[index]
            .as_mut()
            .expect("a linked index must point to an occupied slot")
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = {
            let node = self.node_mut(index);
            (node.prev.take(), node.next.take())
        };

        // [P] <-> [I] <-> [N]   becomes   [P] <-> [N]
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    fn link_back(&mut self, index: usize) {
        let tail = self.tail;
        self.node_mut(index).prev = tail;

        match tail {
            Some(tail) => self.node_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
    }
}

pub(crate) struct Iter<'a, T> {
    list: &'a OrderList<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        let node = self.list.slots[index]
            .as_ref()
            .expect("a linked index must point to an occupied slot");

        self.next = node.next;
        self.remaining -= 1;
        Some((index, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::dict::order_list::OrderList;

    fn values(list: &OrderList<String>) -> Vec<&str> {
        list.iter().map(|(_, value)| value.as_str()).collect()
    }

    fn remove_front(list: &mut OrderList<String>) -> Option<String> {
        let front = list.front()?;
        list.remove(front)
    }

    #[test]
    fn it_is_empty() {
        // given
        let mut list = OrderList::with_capacity(1);

        // when
        list.push_back(String::from("hello world"));
        remove_front(&mut list);

        // then
        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
    }

    #[test]
    fn it_removes_in_insertion_order() {
        // given
        let mut list = OrderList::with_capacity(3);
        list.push_back(String::from("first"));
        list.push_back(String::from("second"));
        list.push_back(String::from("third"));

        // when
        let popped = remove_front(&mut list);

        // then
        assert_eq!(popped.as_deref(), Some("first"));
        assert_eq!(values(&list), vec!["second", "third"]);
    }

    #[test]
    fn it_removes_from_the_middle() {
        // given
        let mut list = OrderList::with_capacity(3);
        list.push_back(String::from("first"));
        let second = list.push_back(String::from("second"));
        list.push_back(String::from("third"));

        // when
        let removed = list.remove(second);

        // then
        assert_eq!(removed.as_deref(), Some("second"));
        assert_eq!(values(&list), vec!["first", "third"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn it_removes_head_and_tail() {
        // given
        let mut list = OrderList::with_capacity(3);
        let first = list.push_back(String::from("first"));
        list.push_back(String::from("second"));
        let third = list.push_back(String::from("third"));

        // when
        list.remove(first);
        list.remove(third);

        // then
        assert_eq!(values(&list), vec!["second"]);
        assert_eq!(list.front(), list.back());
    }

    #[test]
    fn it_returns_none_for_vacant_slots() {
        // given
        let mut list = OrderList::with_capacity(2);
        let first = list.push_back(String::from("first"));
        list.remove(first);

        // when
        let removed_twice = list.remove(first);
        let out_of_bounds = list.remove(42);

        // then
        assert!(removed_twice.is_none());
        assert!(out_of_bounds.is_none());
        assert!(!list.move_to_back(first));
    }

    #[test]
    fn it_moves_items_to_the_back() {
        // given
        let mut list = OrderList::with_capacity(3);
        let first = list.push_back(String::from("first"));
        list.push_back(String::from("second"));
        list.push_back(String::from("third"));

        // when
        let moved = list.move_to_back(first);

        // then
        assert!(moved);
        assert_eq!(values(&list), vec!["second", "third", "first"]);
        assert_eq!(list.back(), Some(first));
        assert_eq!(list.get(first).map(String::as_str), Some("first"));
    }

    #[test]
    fn it_keeps_order_when_moving_the_tail() {
        // given
        let mut list = OrderList::with_capacity(2);
        list.push_back(String::from("first"));
        let second = list.push_back(String::from("second"));

        // when
        list.move_to_back(second);

        // then
        assert_eq!(values(&list), vec!["first", "second"]);
    }

    #[test]
    fn it_reuses_freed_slots() {
        // given
        let mut list = OrderList::with_capacity(2);
        list.push_back(String::from("first"));
        list.push_back(String::from("second"));

        // when
        for i in 0..100 {
            remove_front(&mut list).unwrap();
            list.push_back(format!("item{i}"));
        }

        // then
        assert_eq!(list.slots.len(), 2);
        assert_eq!(list.len(), 2);
        assert_eq!(values(&list), vec!["item98", "item99"]);
    }

    #[test]
    fn it_clears_all_items() {
        // given
        let mut list = OrderList::with_capacity(2);
        list.push_back(String::from("first"));
        list.push_back(String::from("second"));

        // when
        list.clear();

        // then
        assert_eq!(list.len(), 0);
        assert_eq!(list.iter().count(), 0);
        assert_eq!(list.front(), None);
    }

    #[test]
    fn it_mutates_items_in_place() {
        // given
        let mut list = OrderList::with_capacity(1);
        let index = list.push_back(String::from("hello"));

        // when
        if let Some(value) = list.get_mut(index) {
            value.push_str(" world");
        }

        // then
        assert_eq!(values(&list), vec!["hello world"]);
    }
}
