/// Type alias for sets, we use this to hide which type of set we are actually using. Iteration
/// follows insertion order, which keeps summaries and traces reproducible.
pub type Set<S> = indexmap::IndexSet<S, fxhash::FxBuildHasher>;
/// Type alias for maps, we use this to hide which type of map we are actually using. Iteration
/// follows insertion order.
pub type Map<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;
