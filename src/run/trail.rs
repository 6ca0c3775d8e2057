use std::rc::Rc;

/// An immutable singly linked list, where pushing creates a new list that shares its tail with
/// the old one. Each branch of the search owns its own trail of moves, while sibling branches
/// share the common prefix.
#[derive(Debug)]
pub(crate) struct Trail<T>(Option<Rc<Node<T>>>);

#[derive(Debug)]
struct Node<T> {
    head: T,
    tail: Trail<T>,
    len: usize,
}

impl<T> Clone for Trail<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Trail<T> {
    /// Returns a new trail with `head` in front of `self`.
    pub fn push(&self, head: T) -> Self {
        Self(Some(Rc::new(Node {
            head,
            tail: self.clone(),
            len: self.len() + 1,
        })))
    }

    /// Returns the most recently pushed element.
    pub fn peek(&self) -> Option<&T> {
        self.0.as_ref().map(|node| &node.head)
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |node| node.len)
    }

    /// Iterates from the most recently pushed element to the oldest one.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let mut current = self.0.as_deref();
        std::iter::from_fn(move || {
            let node = current?;
            current = node.tail.0.as_deref();
            Some(&node.head)
        })
    }

    /// Collects the elements, oldest first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out: Vec<T> = self.iter().cloned().collect();
        out.reverse();
        out
    }
}

impl<T> Drop for Trail<T> {
    // dropping node by node keeps long trails from exhausting the call stack
    fn drop(&mut self) {
        let mut current = self.0.take();
        while let Some(node) = current {
            match Rc::try_unwrap(node) {
                Ok(mut node) => current = node.tail.0.take(),
                Err(_) => break,
            }
        }
    }
}
