/// A stored element: the key and, for maps, its value. Sets use `V = ()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Node<K, V> {
    #[inline]
    pub(crate) fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}
